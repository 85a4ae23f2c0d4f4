//! State machine around the user editor dialog.
//!
//! ```text
//! Idle --begin--> Editing --save--> Saving --ok--> Idle
//!                    ^                 |
//!                    +-----failed------+
//! Editing --cancel--> Idle
//! ```

use std::mem;

use crate::domain::{Error, UserAssignment, UserEditor};

/// Transition errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EditFlowError {
    /// Save requested with no editor open.
    #[error("An unexpected error occurred.")]
    NotEditing,
    /// A save is already being written.
    #[error("A save is already in progress.")]
    SaveInFlight,
}

impl From<EditFlowError> for Error {
    fn from(err: EditFlowError) -> Self {
        Error::invalid_request(err.to_string())
    }
}

/// Coarse phase, for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EditPhase {
    Idle,
    Editing,
    Saving,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditFlow {
    #[default]
    Idle,
    Editing(UserEditor),
    Saving(UserEditor),
}

impl EditFlow {
    pub fn phase(&self) -> EditPhase {
        match self {
            Self::Idle => EditPhase::Idle,
            Self::Editing(_) => EditPhase::Editing,
            Self::Saving(_) => EditPhase::Saving,
        }
    }

    /// The open editor in either the editing or saving phase.
    pub fn editor(&self) -> Option<&UserEditor> {
        match self {
            Self::Idle => None,
            Self::Editing(editor) | Self::Saving(editor) => Some(editor),
        }
    }

    /// Mutable access is only granted while editing.
    pub fn editor_mut(&mut self) -> Option<&mut UserEditor> {
        match self {
            Self::Editing(editor) => Some(editor),
            Self::Idle | Self::Saving(_) => None,
        }
    }

    /// Open `editor`, replacing any editor that is not mid-save.
    pub fn begin(&mut self, editor: UserEditor) -> Result<(), EditFlowError> {
        if matches!(self, Self::Saving(_)) {
            return Err(EditFlowError::SaveInFlight);
        }
        *self = Self::Editing(editor);
        Ok(())
    }

    /// Close the editor. Ignored while saving; returns whether it closed.
    pub fn cancel(&mut self) -> bool {
        if matches!(self, Self::Editing(_)) {
            *self = Self::Idle;
            return true;
        }
        false
    }

    /// Move to `Saving` and hand back the submission.
    pub fn start_save(&mut self) -> Result<UserAssignment, EditFlowError> {
        match mem::take(self) {
            Self::Editing(editor) => {
                let submission = editor.submission();
                *self = Self::Saving(editor);
                Ok(submission)
            }
            Self::Saving(editor) => {
                *self = Self::Saving(editor);
                Err(EditFlowError::SaveInFlight)
            }
            Self::Idle => Err(EditFlowError::NotEditing),
        }
    }

    /// Settle a save: close on success, reopen the same editor on failure.
    pub fn finish_save(&mut self, succeeded: bool) {
        *self = match mem::take(self) {
            Self::Saving(_) if succeeded => Self::Idle,
            Self::Saving(editor) => Self::Editing(editor),
            other => other,
        };
    }
}

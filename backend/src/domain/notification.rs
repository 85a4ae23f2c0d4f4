//! Toast notifications surfaced for every mutating console action.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Error;

/// Visual weight of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum NotificationVariant {
    /// Neutral confirmation.
    Default,
    /// Failure that needs the user's attention.
    Destructive,
}

/// Title and description shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub variant: NotificationVariant,
    #[schema(example = "Success")]
    pub title: String,
    #[schema(example = "Business unit created.")]
    pub description: String,
}

impl Notification {
    /// Title of every success notification.
    pub const SUCCESS_TITLE: &'static str = "Success";
    /// Title used for precondition failures.
    pub const PRECONDITION_TITLE: &'static str = "Error";

    /// Success notification with the standard title.
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Default,
            title: Self::SUCCESS_TITLE.to_owned(),
            description: description.into(),
        }
    }

    /// Destructive notification.
    pub fn failure(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: NotificationVariant::Destructive,
            title: title.into(),
            description: description.into(),
        }
    }

    /// Whether this notification reports a failure.
    pub fn is_failure(&self) -> bool {
        self.variant == NotificationVariant::Destructive
    }
}

/// Mutating console actions and their notification copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleAction {
    UpdateUser,
    AssignManager,
    RemoveManager,
    CreateBusinessUnit,
}

impl ConsoleAction {
    /// Description of the success notification.
    pub fn success_description(self) -> &'static str {
        match self {
            Self::UpdateUser => "User updated successfully.",
            Self::AssignManager => "Manager assigned successfully.",
            Self::RemoveManager => "Manager role removed.",
            Self::CreateBusinessUnit => "Business unit created.",
        }
    }

    /// Title of the notification raised when the write fails.
    pub fn failure_title(self) -> &'static str {
        match self {
            Self::UpdateUser => "Error updating user",
            Self::AssignManager => "Error assigning manager",
            Self::RemoveManager => "Error removing manager",
            Self::CreateBusinessUnit => "Error creating business unit",
        }
    }

    /// Success notification for this action.
    pub fn succeeded(self) -> Notification {
        Notification::success(self.success_description())
    }

    /// Failure notification for this action.
    ///
    /// Precondition failures use the generic title; write failures use the
    /// action title. Both carry the error message.
    pub fn failed(self, error: &Error) -> Notification {
        let title = if error.is_precondition() {
            Notification::PRECONDITION_TITLE
        } else {
            self.failure_title()
        };
        Notification::failure(title, error.message())
    }
}

//! Inline forms on the console page: manager assignment and business-unit
//! registration.
//!
//! Each form tracks its own in-flight flag. Successful submissions clear the
//! form; failed ones leave the input for the user to retry.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::Error;

/// Whether a form submission is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FormPhase {
    #[default]
    Ready,
    Submitting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("A submission is already in progress.")]
    SubmissionInFlight,
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Error::invalid_request(err.to_string())
    }
}

/// Manager picker plus business unit picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentForm {
    user_id: String,
    business_unit_id: String,
    phase: FormPhase,
}

impl AssignmentForm {
    pub fn select_user(&mut self, user_id: impl Into<String>) {
        self.user_id = user_id.into();
    }

    pub fn select_business_unit(&mut self, business_unit_id: impl Into<String>) {
        self.business_unit_id = business_unit_id.into();
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    /// Mark the form as submitting and return the raw selection.
    pub fn begin_submit(&mut self) -> Result<(String, String), FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::SubmissionInFlight);
        }
        self.phase = FormPhase::Submitting;
        Ok((self.user_id.clone(), self.business_unit_id.clone()))
    }

    pub fn finish_submit(&mut self, succeeded: bool) {
        if succeeded {
            *self = Self::default();
        } else {
            self.phase = FormPhase::Ready;
        }
    }

    pub fn view(&self) -> AssignmentFormView {
        AssignmentFormView {
            user_id: non_empty(&self.user_id),
            business_unit_id: non_empty(&self.business_unit_id),
            phase: self.phase,
        }
    }
}

/// Name field for a new business unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    name: String,
    phase: FormPhase,
}

impl RegistrationForm {
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn begin_submit(&mut self) -> Result<String, FormError> {
        if self.phase == FormPhase::Submitting {
            return Err(FormError::SubmissionInFlight);
        }
        self.phase = FormPhase::Submitting;
        Ok(self.name.clone())
    }

    pub fn finish_submit(&mut self, succeeded: bool) {
        if succeeded {
            *self = Self::default();
        } else {
            self.phase = FormPhase::Ready;
        }
    }

    pub fn view(&self) -> RegistrationFormView {
        RegistrationFormView {
            name: self.name.clone(),
            phase: self.phase,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentFormView {
    pub user_id: Option<String>,
    pub business_unit_id: Option<String>,
    pub phase: FormPhase,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFormView {
    pub name: String,
    pub phase: FormPhase,
}

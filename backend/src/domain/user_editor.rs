//! Form state for editing a user's role and business unit.
//!
//! The editor holds a selection and nothing else. Submitting produces a
//! [`UserAssignment`]; writing it is the console's job.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BusinessUnit, BusinessUnitId, Error, User, UserAssignment, UserRole};

/// Selection errors raised by the editor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserEditorError {
    /// The business unit is not among the offered options.
    #[error("business unit {id} is not available")]
    UnknownBusinessUnit { id: BusinessUnitId },
}

impl From<UserEditorError> for Error {
    fn from(err: UserEditorError) -> Self {
        Error::invalid_request(err.to_string())
    }
}

/// Role and business unit picker for one target user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserEditor {
    target: User,
    offered_units: Vec<BusinessUnit>,
    role: UserRole,
    business_unit_id: Option<BusinessUnitId>,
}

impl UserEditor {
    /// Open the editor with the target's current role and business unit
    /// selected.
    pub fn new(target: User, offered_units: Vec<BusinessUnit>) -> Self {
        let role = target.role();
        let business_unit_id = target.business_unit_id().cloned();
        Self {
            target,
            offered_units,
            role,
            business_unit_id,
        }
    }

    /// Point the editor at another user and reload the selection from them.
    pub fn retarget(&mut self, target: User) {
        self.role = target.role();
        self.business_unit_id = target.business_unit_id().cloned();
        self.target = target;
    }

    /// Replace the business units offered by the picker.
    ///
    /// The current selection is kept even if it is no longer offered.
    pub fn offer_units(&mut self, units: Vec<BusinessUnit>) {
        self.offered_units = units;
    }

    pub fn target(&self) -> &User {
        &self.target
    }

    pub fn offered_units(&self) -> &[BusinessUnit] {
        &self.offered_units
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn business_unit_id(&self) -> Option<&BusinessUnitId> {
        self.business_unit_id.as_ref()
    }

    /// Dialog title, e.g. `Edit User: Ada Lovelace`.
    pub fn title(&self) -> String {
        format!("Edit User: {}", self.target.label())
    }

    pub fn select_role(&mut self, role: UserRole) {
        self.role = role;
    }

    /// Select one of the offered business units.
    ///
    /// The target's stored unit is always accepted, so a dangling reference
    /// survives a role-only edit.
    pub fn select_business_unit(&mut self, id: &BusinessUnitId) -> Result<(), UserEditorError> {
        let is_current = self.target.business_unit_id() == Some(id);
        if !is_current && !self.offered_units.iter().any(|unit| unit.id() == id) {
            return Err(UserEditorError::UnknownBusinessUnit { id: id.clone() });
        }
        self.business_unit_id = Some(id.clone());
        Ok(())
    }

    pub fn clear_business_unit(&mut self) {
        self.business_unit_id = None;
    }

    /// The selection as a write request for the target user.
    pub fn submission(&self) -> UserAssignment {
        UserAssignment {
            user_id: self.target.id().clone(),
            role: self.role,
            business_unit_id: self.business_unit_id.clone(),
        }
    }

    /// Serialisable snapshot for clients.
    pub fn view(&self) -> EditorView {
        EditorView {
            user_id: self.target.id().to_string(),
            title: self.title(),
            role: self.role,
            business_unit_id: self.business_unit_id.as_ref().map(ToString::to_string),
            roles: UserRole::ALL.to_vec(),
            business_units: self.offered_units.clone(),
        }
    }
}

/// Editor dialog as rendered by clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditorView {
    pub user_id: String,
    #[schema(example = "Edit User: Ada Lovelace")]
    pub title: String,
    pub role: UserRole,
    pub business_unit_id: Option<String>,
    pub roles: Vec<UserRole>,
    pub business_units: Vec<BusinessUnit>,
}

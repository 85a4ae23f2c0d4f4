//! Joins the three live collections into the rows the console renders.
//!
//! References are resolved against the latest snapshots. A user whose
//! business unit no longer exists shows no unit; a manager role whose user or
//! unit is gone is not shown at all.

use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AssignmentFormView, BusinessUnit, BusinessUnitId, EditPhase, EditorView, ManagerRole,
    RegistrationFormView, User, UserId, UserRole,
};

/// One row of the user table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserRow {
    pub id: String,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// `None` when unassigned or when the unit no longer exists.
    pub business_unit_name: Option<String>,
}

/// One row of the manager table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRow {
    #[schema(example = "eng_ada")]
    pub id: String,
    pub user_id: String,
    pub user_name: String,
    pub business_unit_id: String,
    pub business_unit_name: String,
}

/// Entry in the manager picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerCandidate {
    pub id: String,
    pub label: String,
}

/// Whether each collection has produced its first snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub users: bool,
    pub business_units: bool,
    pub manager_roles: bool,
}

/// Edit dialog state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditView {
    pub phase: EditPhase,
    pub editor: Option<EditorView>,
}

impl Default for EditView {
    fn default() -> Self {
        Self {
            phase: EditPhase::Idle,
            editor: None,
        }
    }
}

/// Everything the console page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleView {
    pub users: Vec<UserRow>,
    pub business_units: Vec<BusinessUnit>,
    pub managers: Vec<ManagerRow>,
    pub manager_candidates: Vec<ManagerCandidate>,
    pub loading: LoadingState,
    pub edit: EditView,
    pub assignment: AssignmentFormView,
    pub registration: RegistrationFormView,
}

impl ConsoleView {
    /// View of `roster` with the dialog closed and both forms empty.
    pub fn from_roster(roster: &Roster<'_>, loading: LoadingState) -> Self {
        Self {
            users: roster.user_rows(),
            business_units: roster.business_units.to_vec(),
            managers: roster.manager_rows(),
            manager_candidates: roster.manager_candidates(),
            loading,
            edit: EditView::default(),
            assignment: AssignmentFormView::default(),
            registration: RegistrationFormView::default(),
        }
    }
}

/// Borrowed snapshots of the three collections.
#[derive(Debug, Clone, Copy)]
pub struct Roster<'a> {
    users: &'a [User],
    business_units: &'a [BusinessUnit],
    manager_roles: &'a [ManagerRole],
}

impl<'a> Roster<'a> {
    pub fn new(
        users: &'a [User],
        business_units: &'a [BusinessUnit],
        manager_roles: &'a [ManagerRole],
    ) -> Self {
        Self {
            users,
            business_units,
            manager_roles,
        }
    }

    fn unit_names(&self) -> HashMap<&'a BusinessUnitId, &'a str> {
        self.business_units
            .iter()
            .map(|unit| (unit.id(), unit.name().as_ref()))
            .collect()
    }

    /// User table rows, in collection order.
    pub fn user_rows(&self) -> Vec<UserRow> {
        let units = self.unit_names();
        self.users
            .iter()
            .map(|user| UserRow {
                id: user.id().to_string(),
                name: user.label().to_owned(),
                email: user.email().as_ref().to_owned(),
                role: user.role(),
                business_unit_name: user
                    .business_unit_id()
                    .and_then(|id| units.get(id))
                    .map(|name| (*name).to_owned()),
            })
            .collect()
    }

    /// Manager table rows. Roles referencing a missing user or unit are
    /// skipped.
    pub fn manager_rows(&self) -> Vec<ManagerRow> {
        let units = self.unit_names();
        let users: HashMap<&UserId, &User> =
            self.users.iter().map(|user| (user.id(), user)).collect();
        self.manager_roles
            .iter()
            .filter_map(|role| {
                let user = users.get(role.user_id())?;
                let unit_name = units.get(role.business_unit_id())?;
                Some(ManagerRow {
                    id: role.id().to_string(),
                    user_id: role.user_id().to_string(),
                    user_name: user.label().to_owned(),
                    business_unit_id: role.business_unit_id().to_string(),
                    business_unit_name: (*unit_name).to_owned(),
                })
            })
            .collect()
    }

    /// Users eligible for a manager role: those whose role is manager.
    pub fn manager_candidates(&self) -> Vec<ManagerCandidate> {
        self.users
            .iter()
            .filter(|user| user.role() == UserRole::Manager)
            .map(|user| ManagerCandidate {
                id: user.id().to_string(),
                label: user.label().to_owned(),
            })
            .collect()
    }
}

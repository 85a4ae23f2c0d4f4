//! Manager-role assignment and removal.

use std::sync::Arc;

use crate::domain::ports::DirectoryStore;
use crate::domain::{BusinessUnitId, Error, ManagerRole, ManagerRoleId, UserId};

/// Message returned when either side of the pair is missing.
pub const SELECT_PAIR_MESSAGE: &str = "Please select a user and a business unit.";

/// Writes and deletes manager-role join records.
#[derive(Clone)]
pub struct ManagerRoleAssignor {
    directory: Arc<dyn DirectoryStore>,
}

impl ManagerRoleAssignor {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }

    /// Grant `user_id` managerial authority over `business_unit_id`.
    ///
    /// Both inputs are trimmed and must be non-empty; nothing is written
    /// otherwise. The record is stored under
    /// [`ManagerRoleId::derive`], so repeating an assignment overwrites it.
    pub async fn assign(&self, user_id: &str, business_unit_id: &str) -> Result<ManagerRole, Error> {
        let (user_id, business_unit_id) = (user_id.trim(), business_unit_id.trim());
        if user_id.is_empty() || business_unit_id.is_empty() {
            return Err(Error::invalid_request(SELECT_PAIR_MESSAGE));
        }
        let user_id =
            UserId::new(user_id).map_err(|err| Error::invalid_request(err.to_string()))?;
        let business_unit_id = BusinessUnitId::new(business_unit_id)
            .map_err(|err| Error::invalid_request(err.to_string()))?;

        let role = ManagerRole::assign(user_id, business_unit_id);
        self.directory.set_manager_role(&role).await?;
        Ok(role)
    }

    /// Delete a manager role. Missing ids are not an error.
    pub async fn remove(&self, id: &ManagerRoleId) -> Result<(), Error> {
        self.directory.delete_manager_role(id).await?;
        Ok(())
    }
}

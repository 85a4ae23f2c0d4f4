//! Manager roles: join records granting a user managerial authority over one
//! business unit.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{BusinessUnitId, UserId};

/// Validation errors for manager role identifiers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManagerRoleValidationError {
    /// Identifier was empty.
    #[error("manager role id must not be empty")]
    EmptyId,
    /// Identifier contained `/` or surrounding whitespace.
    #[error("manager role id must not contain '/' or surrounding whitespace")]
    InvalidId,
}

/// Document key of a manager role.
///
/// Keys are derived from the pair they join (see [`ManagerRoleId::derive`]), so
/// repeating an assignment overwrites the existing record instead of creating
/// a second one. That derivation is the only de-duplication mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ManagerRoleId(String);

impl ManagerRoleId {
    /// Derive the key for a (business unit, user) pair as `"{unit}_{user}"`.
    ///
    /// Both the create and lookup paths use this function.
    ///
    /// # Examples
    /// ```
    /// use admin_console::domain::{BusinessUnitId, ManagerRoleId, UserId};
    ///
    /// let unit = BusinessUnitId::new("eng").unwrap();
    /// let user = UserId::new("ada").unwrap();
    /// assert_eq!(ManagerRoleId::derive(&unit, &user).as_ref(), "eng_ada");
    /// ```
    pub fn derive(business_unit_id: &BusinessUnitId, user_id: &UserId) -> Self {
        Self(format!("{business_unit_id}_{user_id}"))
    }

    /// Parse a key received from a client, e.g. for removal.
    pub fn new(id: impl Into<String>) -> Result<Self, ManagerRoleValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ManagerRoleValidationError::EmptyId);
        }
        if id.trim() != id || id.contains('/') {
            return Err(ManagerRoleValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ManagerRoleId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ManagerRoleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ManagerRoleId> for String {
    fn from(value: ManagerRoleId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ManagerRoleId {
    type Error = ManagerRoleValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Manager role record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerRole {
    #[schema(value_type = String, example = "eng_ada")]
    id: ManagerRoleId,
    #[schema(value_type = String, example = "ada")]
    user_id: UserId,
    #[schema(value_type = String, example = "eng")]
    business_unit_id: BusinessUnitId,
}

impl ManagerRole {
    /// Build the join record for a pair, deriving its key.
    pub fn assign(user_id: UserId, business_unit_id: BusinessUnitId) -> Self {
        Self {
            id: ManagerRoleId::derive(&business_unit_id, &user_id),
            user_id,
            business_unit_id,
        }
    }

    /// Document key.
    pub fn id(&self) -> &ManagerRoleId {
        &self.id
    }

    /// Referenced user.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Referenced business unit.
    pub fn business_unit_id(&self) -> &BusinessUnitId {
        &self.business_unit_id
    }
}

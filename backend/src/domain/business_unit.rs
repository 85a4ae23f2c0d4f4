//! Business units: organisational groupings users and managers belong to.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Validation errors for business unit values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BusinessUnitValidationError {
    /// Identifier was empty.
    #[error("business unit id must not be empty")]
    EmptyId,
    /// Identifier contained `/` or surrounding whitespace.
    #[error("business unit id must not contain '/' or surrounding whitespace")]
    InvalidId,
    /// Name was empty once trimmed.
    #[error("Business unit name cannot be empty.")]
    EmptyName,
}

/// Document key of a business unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessUnitId(String);

impl BusinessUnitId {
    /// Validate and construct a [`BusinessUnitId`].
    pub fn new(id: impl Into<String>) -> Result<Self, BusinessUnitValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(BusinessUnitValidationError::EmptyId);
        }
        if id.trim() != id || id.contains('/') {
            return Err(BusinessUnitValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh identifier for a newly created unit.
    ///
    /// Generated identifiers are lower-case hex and never contain `_`, which
    /// keeps derived manager-role keys unambiguous.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl AsRef<str> for BusinessUnitId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BusinessUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<BusinessUnitId> for String {
    fn from(value: BusinessUnitId) -> Self {
        value.0
    }
}

impl TryFrom<String> for BusinessUnitId {
    type Error = BusinessUnitValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Trimmed, non-empty business unit name. Names are not unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BusinessUnitName(String);

impl BusinessUnitName {
    /// Trim and validate a proposed name.
    ///
    /// # Examples
    /// ```
    /// use admin_console::domain::BusinessUnitName;
    ///
    /// let name = BusinessUnitName::new("  Engineering ").unwrap();
    /// assert_eq!(name.as_ref(), "Engineering");
    /// assert!(BusinessUnitName::new("   ").is_err());
    /// ```
    pub fn new(name: impl AsRef<str>) -> Result<Self, BusinessUnitValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BusinessUnitValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for BusinessUnitName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BusinessUnitName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<BusinessUnitName> for String {
    fn from(value: BusinessUnitName) -> Self {
        value.0
    }
}

impl TryFrom<String> for BusinessUnitName {
    type Error = BusinessUnitValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Business unit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BusinessUnit {
    #[schema(value_type = String, example = "4f0c1d3e9a7b4c55b2e1f0a9d8c7b6a5")]
    id: BusinessUnitId,
    #[schema(value_type = String, example = "Engineering")]
    name: BusinessUnitName,
}

impl BusinessUnit {
    /// Build a business unit from validated parts.
    pub fn new(id: BusinessUnitId, name: BusinessUnitName) -> Self {
        Self { id, name }
    }

    /// Document key.
    pub fn id(&self) -> &BusinessUnitId {
        &self.id
    }

    /// Display name.
    pub fn name(&self) -> &BusinessUnitName {
        &self.name
    }
}

//! User data model.
//!
//! Users are created outside the console (at sign-up); the console only edits
//! their role and business unit through a [`UserAssignment`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::BusinessUnitId;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyEmail,
    InvalidEmail,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => {
                write!(f, "user id must not contain '/' or surrounding whitespace")
            }
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain '@'"),
            Self::UnknownRole { value } => {
                write!(f, "unknown role '{value}'; expected employee, manager, or admin")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier issued by the authentication provider.
///
/// Identifiers are opaque strings. They double as document keys, so they must
/// not contain `/` and must not carry surrounding whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    pub fn new(id: impl Into<String>) -> Result<Self, UserValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id || id.contains('/') {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Email address used as the fallback label when no display name is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`]; surrounding whitespace is trimmed.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let email = email.as_ref().trim();
        if email.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !email.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Console role granted to a user.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Regular staff member.
    #[default]
    Employee,
    /// Manager of one or more business units.
    Manager,
    /// Console administrator.
    Admin,
}

impl UserRole {
    /// Every role offered by the user editor, in display order.
    pub const ALL: [UserRole; 3] = [Self::Employee, Self::Manager, Self::Admin];

    /// Wire representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Manager => "manager",
            Self::Admin => "admin",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Employee => "Employee",
            Self::Manager => "Manager",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "employee" => Ok(Self::Employee),
            "manager" => Ok(Self::Manager),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Console user record.
///
/// ## Invariants
/// - `id` is a valid [`UserId`].
/// - `display_name`, when present, is non-blank.
/// - A stored record without a role is read as [`UserRole::Employee`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "UserDto", into = "UserDto")]
pub struct User {
    #[schema(value_type = String, example = "0mWq3kYc8xZ")]
    id: UserId,
    #[schema(value_type = Option<String>, example = "Ada Lovelace")]
    display_name: Option<String>,
    #[schema(value_type = String, example = "ada@example.com")]
    email: Email,
    role: UserRole,
    #[schema(value_type = Option<String>)]
    business_unit_id: Option<BusinessUnitId>,
}

impl User {
    /// Build a user with no business unit.
    pub fn new(id: UserId, email: Email, role: UserRole) -> Self {
        Self {
            id,
            display_name: None,
            email,
            role,
            business_unit_id: None,
        }
    }

    /// Attach a display name; blank names are ignored.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        let display_name = display_name.into();
        self.display_name = (!display_name.trim().is_empty()).then_some(display_name);
        self
    }

    /// Attach a business unit reference.
    #[must_use]
    pub fn with_business_unit(mut self, business_unit_id: BusinessUnitId) -> Self {
        self.business_unit_id = Some(business_unit_id);
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Optional display name.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Current role.
    pub fn role(&self) -> UserRole {
        self.role
    }

    /// Referenced business unit, which may no longer exist.
    pub fn business_unit_id(&self) -> Option<&BusinessUnitId> {
        self.business_unit_id.as_ref()
    }

    /// Whether the user may open the admin console.
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Label shown in tables and pickers: display name, else email.
    pub fn label(&self) -> &str {
        self.display_name().unwrap_or_else(|| self.email.as_ref())
    }

    /// Apply an editor submission. Only role and business unit change.
    pub fn apply(&mut self, assignment: &UserAssignment) {
        self.role = assignment.role;
        self.business_unit_id = assignment.business_unit_id.clone();
    }
}

/// Role and business-unit selection submitted by the user editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAssignment {
    /// User being edited.
    pub user_id: UserId,
    /// Selected role.
    pub role: UserRole,
    /// Selected business unit, if any.
    pub business_unit_id: Option<BusinessUnitId>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDto {
    #[serde(alias = "uid")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    email: String,
    #[serde(default)]
    role: UserRole,
    // Stored records may carry an empty string for "no business unit".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    business_unit_id: Option<String>,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let User {
            id,
            display_name,
            email,
            role,
            business_unit_id,
        } = value;
        Self {
            id: id.into(),
            display_name,
            email: email.into(),
            role,
            business_unit_id: business_unit_id.map(String::from),
        }
    }
}

impl TryFrom<UserDto> for User {
    type Error = UserValidationError;

    fn try_from(value: UserDto) -> Result<Self, Self::Error> {
        let mut user = User::new(UserId::new(value.id)?, Email::new(value.email)?, value.role);
        if let Some(name) = value.display_name {
            user = user.with_display_name(name);
        }
        user.business_unit_id = value
            .business_unit_id
            .and_then(|raw| BusinessUnitId::new(raw).ok());
        Ok(user)
    }
}

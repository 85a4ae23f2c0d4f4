//! Driven port for the document directory holding users, business units and
//! manager roles.
//!
//! Reads are push-based: each `subscribe_*` call hands back a [`LiveQuery`]
//! that re-yields whenever the collection changes. Writes are independent
//! single-document operations with last-write-wins semantics.

use async_trait::async_trait;

use crate::domain::{
    BusinessUnit, BusinessUnitName, Error, ManagerRole, ManagerRoleId, User, UserAssignment,
    UserId,
};

use super::{LiveQuery, define_port_error};

define_port_error! {
    /// Errors raised by directory adapters.
    pub enum DirectoryError {
        /// The directory could not be reached.
        Connection { message } => "directory connection failed: {message}",
        /// A read or write failed during execution.
        Query { message } => "directory query failed: {message}",
        /// An update targeted a document that does not exist.
        MissingDocument { collection, id } =>
            "no {collection} document with id {id}",
    }
}

/// Collection-oriented access to the console's documents.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryStore: Send + Sync {
    /// Live view of every user.
    fn subscribe_users(&self) -> LiveQuery<User>;

    /// Live view of every business unit, in creation order.
    fn subscribe_business_units(&self) -> LiveQuery<BusinessUnit>;

    /// Live view of every manager role.
    fn subscribe_manager_roles(&self) -> LiveQuery<ManagerRole>;

    /// Fetch a single user.
    async fn get_user(&self, id: &UserId) -> Result<Option<User>, DirectoryError>;

    /// Create or replace a user document.
    async fn put_user(&self, user: &User) -> Result<(), DirectoryError>;

    /// Overwrite the role and business unit of an existing user.
    ///
    /// Fails with [`DirectoryError::MissingDocument`] when the user is absent.
    async fn update_user(&self, assignment: &UserAssignment) -> Result<User, DirectoryError>;

    /// Append a business unit under a freshly generated id.
    async fn add_business_unit(
        &self,
        name: &BusinessUnitName,
    ) -> Result<BusinessUnit, DirectoryError>;

    /// Write a manager role under its own id, replacing any existing record.
    async fn set_manager_role(&self, role: &ManagerRole) -> Result<(), DirectoryError>;

    /// Delete a manager role. Deleting an absent id succeeds.
    async fn delete_manager_role(&self, id: &ManagerRoleId) -> Result<(), DirectoryError>;
}

impl From<DirectoryError> for Error {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Connection { message } => Error::service_unavailable(message),
            DirectoryError::Query { message } => Error::internal(message),
            err @ DirectoryError::MissingDocument { .. } => Error::not_found(err.to_string()),
        }
    }
}

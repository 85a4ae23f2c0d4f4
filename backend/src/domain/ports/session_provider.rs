//! Driven port resolving an authenticated session to its user record.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Look up the user behind a session cookie.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Return the user for `id`, or `None` when no record exists.
    async fn session_user(&self, id: &UserId) -> Result<Option<User>, Error>;
}

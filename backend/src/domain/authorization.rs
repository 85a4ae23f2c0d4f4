//! Admin-only access control.
//!
//! The gate never talks to a router. It turns the session state into a
//! [`GateDecision`] and each inbound adapter acts on it: HTTP answers with a
//! `303 See Other`, the WebSocket sends a redirect frame.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::{DirectoryStore, SessionProvider};
use crate::domain::{Error, User, UserId};

/// Where the session lookup stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// Lookup still in flight.
    Loading,
    /// No authenticated user.
    Absent,
    /// Authenticated user record.
    Resolved(User),
}

impl SessionState {
    /// Resolved user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Resolved(user) => Some(user),
            Self::Loading | Self::Absent => None,
        }
    }
}

/// Outcome of evaluating the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Render nothing yet.
    Pending,
    /// Render the console.
    Render,
    /// Send the user elsewhere.
    Redirect(String),
}

/// Admits administrators and redirects everyone else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationGate {
    redirect_route: String,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ROUTE)
    }
}

impl AuthorizationGate {
    /// Route non-admins are sent to unless configured otherwise.
    pub const DEFAULT_ROUTE: &'static str = "/dashboard";

    pub fn new(redirect_route: impl Into<String>) -> Self {
        Self {
            redirect_route: redirect_route.into(),
        }
    }

    pub fn redirect_route(&self) -> &str {
        &self.redirect_route
    }

    /// Decide what to do with a session.
    ///
    /// # Examples
    /// ```
    /// use admin_console::domain::{AuthorizationGate, GateDecision, SessionState};
    ///
    /// let gate = AuthorizationGate::default();
    /// assert_eq!(gate.evaluate(&SessionState::Loading), GateDecision::Pending);
    /// assert_eq!(
    ///     gate.evaluate(&SessionState::Absent),
    ///     GateDecision::Redirect("/dashboard".into())
    /// );
    /// ```
    pub fn evaluate(&self, state: &SessionState) -> GateDecision {
        match state {
            SessionState::Loading => GateDecision::Pending,
            SessionState::Resolved(user) if user.is_admin() => GateDecision::Render,
            SessionState::Resolved(_) | SessionState::Absent => {
                GateDecision::Redirect(self.redirect_route.clone())
            }
        }
    }
}

/// Resolve the session cookie's user id into a [`SessionState`].
///
/// Lookup failures are logged and treated as an absent session; there is no
/// retry.
pub async fn resolve_session(
    provider: &dyn SessionProvider,
    user_id: Option<&UserId>,
) -> SessionState {
    let Some(user_id) = user_id else {
        return SessionState::Absent;
    };
    match provider.session_user(user_id).await {
        Ok(Some(user)) => SessionState::Resolved(user),
        Ok(None) => SessionState::Absent,
        Err(error) => {
            warn!(%user_id, code = ?error.code(), message = error.message(), "session lookup failed");
            SessionState::Absent
        }
    }
}

/// [`SessionProvider`] reading user records from the directory.
#[derive(Clone)]
pub struct DirectorySessionProvider {
    directory: Arc<dyn DirectoryStore>,
}

impl DirectorySessionProvider {
    pub fn new(directory: Arc<dyn DirectoryStore>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl SessionProvider for DirectorySessionProvider {
    async fn session_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        Ok(self.directory.get_user(id).await?)
    }
}

/// Entry in the dashboard navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NavLink {
    #[schema(example = "Dashboard")]
    pub label: &'static str,
    #[schema(example = "/dashboard")]
    pub href: &'static str,
    pub active: bool,
}

const NAV_ENTRIES: [(&str, &str, bool); 3] = [
    ("Dashboard", "/dashboard", false),
    ("My Expenses", "/dashboard/expenses", false),
    ("Admin", "/dashboard/admin", true),
];

/// Navigation links visible to `user`; the admin link is only offered to
/// administrators. A link is active when its href equals `current_path`.
pub fn navigation_links(user: &User, current_path: &str) -> Vec<NavLink> {
    NAV_ENTRIES
        .iter()
        .filter(|(_, _, admin_only)| !admin_only || user.is_admin())
        .map(|&(label, href, _)| NavLink {
            label,
            href,
            active: href == current_path,
        })
        .collect()
}

//! Shared WebSocket adapter state.
//!
//! Each admin connection builds its own console from these ports, so sessions
//! never share dialog or form state.

use std::sync::Arc;

use url::{Origin, Url};

use crate::domain::AuthorizationGate;
use crate::domain::ports::{DirectoryStore, SessionProvider};

/// Dependency bundle for the console socket.
#[derive(Clone)]
pub struct WsState {
    pub directory: Arc<dyn DirectoryStore>,
    pub sessions: Arc<dyn SessionProvider>,
    pub gate: AuthorizationGate,
    allowed_origins: Arc<[Origin]>,
}

impl WsState {
    /// State with an empty origin allow-list; every upgrade is refused until
    /// [`WsState::with_allowed_origins`] is called.
    pub fn new(
        directory: Arc<dyn DirectoryStore>,
        sessions: Arc<dyn SessionProvider>,
        gate: AuthorizationGate,
    ) -> Self {
        Self {
            directory,
            sessions,
            gate,
            allowed_origins: Arc::from(Vec::new()),
        }
    }

    /// Accept upgrades from these origins. Paths and queries are ignored.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: impl IntoIterator<Item = Url>) -> Self {
        self.allowed_origins = origins.into_iter().map(|url| url.origin()).collect();
        self
    }

    /// Whether `origin` matches an allowed scheme, host and port.
    pub fn allows(&self, origin: &Url) -> bool {
        let origin = origin.origin();
        origin.is_tuple() && self.allowed_origins.contains(&origin)
    }
}

//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see domain ports and
//! services, so tests can wire an in-memory directory or mocks.

use std::sync::Arc;

use crate::domain::ports::{DirectoryStore, LoginService, Notifier, SessionProvider};
use crate::domain::{AuthorizationGate, ConsoleActions, DirectorySessionProvider};

/// Port implementations the HTTP state is built from.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub directory: Arc<dyn DirectoryStore>,
    pub notifier: Arc<dyn Notifier>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub sessions: Arc<dyn SessionProvider>,
    pub console: ConsoleActions,
    pub gate: AuthorizationGate,
}

impl HttpState {
    /// Build handler state; sessions resolve against the same directory the
    /// console writes to.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use admin_console::domain::AuthorizationGate;
    /// use admin_console::domain::ports::{FixtureLoginService, NoOpNotifier};
    /// use admin_console::inbound::http::state::{HttpState, HttpStatePorts};
    /// use admin_console::outbound::memory::InMemoryDirectory;
    ///
    /// let state = HttpState::new(
    ///     HttpStatePorts {
    ///         login: Arc::new(FixtureLoginService),
    ///         directory: Arc::new(InMemoryDirectory::new()),
    ///         notifier: Arc::new(NoOpNotifier),
    ///     },
    ///     AuthorizationGate::default(),
    /// );
    /// assert_eq!(state.gate.redirect_route(), "/dashboard");
    /// ```
    pub fn new(ports: HttpStatePorts, gate: AuthorizationGate) -> Self {
        let HttpStatePorts {
            login,
            directory,
            notifier,
        } = ports;
        Self {
            login,
            sessions: Arc::new(DirectorySessionProvider::new(Arc::clone(&directory))),
            console: ConsoleActions::new(directory, notifier),
            gate,
        }
    }

    /// Replace the session provider.
    #[must_use]
    pub fn with_sessions(mut self, sessions: Arc<dyn SessionProvider>) -> Self {
        self.sessions = sessions;
        self
    }
}

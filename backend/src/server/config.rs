//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
#[cfg(feature = "metrics")]
use actix_web_prom::PrometheusMetrics;
use color_eyre::eyre::{Result, eyre};
use tracing::warn;
use url::Url;

use admin_console::domain::AuthorizationGate;
use admin_console::domain::ports::DirectoryStore;
use admin_console::outbound::memory::InMemoryDirectory;
use admin_console::settings::ConsoleSettings;

/// Minimum accepted length of the session key file.
const MIN_KEY_BYTES: usize = 64;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) directory: Arc<dyn DirectoryStore>,
    pub(crate) gate: AuthorizationGate,
    pub(crate) allowed_origins: Vec<Url>,
    #[cfg(feature = "metrics")]
    pub(crate) prometheus: Option<PrometheusMetrics>,
}

impl ServerConfig {
    /// Configuration backed by an empty in-memory directory.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            directory: Arc::new(InMemoryDirectory::new()),
            gate: AuthorizationGate::default(),
            allowed_origins: Vec::new(),
            #[cfg(feature = "metrics")]
            prometheus: None,
        }
    }

    /// Configuration derived from loaded settings.
    #[must_use]
    pub fn from_settings(settings: &ConsoleSettings, key: Key) -> Self {
        Self::new(key, settings.cookie_secure, SameSite::Lax, settings.bind_addr())
            .with_gate(settings.gate())
            .with_allowed_origins(settings.allowed_origins())
    }

    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn DirectoryStore>) -> Self {
        self.directory = directory;
        self
    }

    #[must_use]
    pub fn with_gate(mut self, gate: AuthorizationGate) -> Self {
        self.gate = gate;
        self
    }

    /// Origins allowed to open the console socket.
    #[must_use]
    pub fn with_allowed_origins(mut self, origins: Vec<Url>) -> Self {
        self.allowed_origins = origins;
        self
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    #[cfg(feature = "metrics")]
    /// Attach Prometheus middleware to the configuration.
    #[must_use]
    pub fn with_metrics(mut self, prometheus: Option<PrometheusMetrics>) -> Self {
        self.prometheus = prometheus;
        self
    }
}

/// Read the session signing key named by the settings.
///
/// Keys shorter than 64 bytes are rejected. An unreadable file falls back to
/// a throwaway key in debug builds or when explicitly allowed.
///
/// # Errors
/// Fails when the key is too short, or unreadable without a permitted
/// fallback.
pub fn load_session_key(settings: &ConsoleSettings) -> Result<Key> {
    session_key_from(
        settings.session_key_file(),
        cfg!(debug_assertions) || settings.allow_ephemeral_session_key,
    )
}

fn session_key_from(path: &Path, allow_ephemeral: bool) -> Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) if bytes.len() < MIN_KEY_BYTES => Err(eyre!(
            "session key at {} is {} bytes; at least {MIN_KEY_BYTES} are required",
            path.display(),
            bytes.len()
        )),
        Ok(bytes) => Ok(Key::from(bytes.as_slice())),
        Err(error) if allow_ephemeral => {
            warn!(path = %path.display(), error = %error, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(error) => Err(eyre!(
            "failed to read session key at {}: {error}",
            path.display()
        )),
    }
}

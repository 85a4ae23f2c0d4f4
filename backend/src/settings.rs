//! Console configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `CONSOLE_*` environment variables and an
//! optional configuration file. Unset values fall back to the defaults below.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::domain::AuthorizationGate;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000";

/// Runtime settings for the console server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONSOLE")]
pub struct ConsoleSettings {
    /// Interface to bind.
    pub host: Option<IpAddr>,
    /// Port to bind.
    pub port: Option<u16>,
    /// Where non-admin sessions are sent.
    pub dashboard_route: Option<String>,
    /// File holding the session signing key (at least 64 bytes).
    pub session_key_file: Option<PathBuf>,
    /// Fall back to a throwaway key when the key file is unreadable.
    #[ortho_config(default = false)]
    pub allow_ephemeral_session_key: bool,
    /// Mark the session cookie `Secure`.
    #[ortho_config(default = true)]
    pub cookie_secure: bool,
    /// Seed the development accounts into the directory at startup.
    #[ortho_config(default = false)]
    pub seed_fixture_accounts: bool,
    /// Comma-separated WebSocket origin allow-list.
    pub allowed_origins: Option<String>,
}

impl ConsoleSettings {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Route non-admin sessions are redirected to.
    pub fn dashboard_route(&self) -> &str {
        self.dashboard_route
            .as_deref()
            .filter(|route| !route.trim().is_empty())
            .unwrap_or(AuthorizationGate::DEFAULT_ROUTE)
    }

    /// Gate configured with [`ConsoleSettings::dashboard_route`].
    pub fn gate(&self) -> AuthorizationGate {
        AuthorizationGate::new(self.dashboard_route())
    }

    pub fn session_key_file(&self) -> &Path {
        self.session_key_file
            .as_deref()
            .unwrap_or_else(|| Path::new(DEFAULT_SESSION_KEY_FILE))
    }

    /// Parsed origin allow-list. Unparsable entries are logged and skipped.
    pub fn allowed_origins(&self) -> Vec<Url> {
        self.allowed_origins
            .as_deref()
            .unwrap_or(DEFAULT_ALLOWED_ORIGINS)
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .filter_map(|entry| match Url::parse(entry) {
                Ok(url) => Some(url),
                Err(error) => {
                    warn!(origin = entry, error = %error, "ignoring invalid allowed origin");
                    None
                }
            })
            .collect()
    }
}

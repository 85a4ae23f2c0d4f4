//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod directory_store;
mod live_query;
mod login_service;
mod notifier;
mod session_provider;

#[cfg(test)]
pub use directory_store::MockDirectoryStore;
pub use directory_store::{DirectoryError, DirectoryStore};
pub use live_query::LiveQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::{NoOpNotifier, Notifier};
#[cfg(test)]
pub use session_provider::MockSessionProvider;
pub use session_provider::SessionProvider;

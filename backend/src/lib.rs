//! Admin console for users, business units and manager roles.
//!
//! The [`domain`] holds the console rules and the ports they depend on;
//! [`inbound`] adapts HTTP and WebSocket traffic to them and [`outbound`]
//! provides the in-memory directory and notification sinks.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;

//! Outbound adapters implementing domain ports.
//!
//! - **memory**: the in-process document directory behind `DirectoryStore`
//! - **notifications**: `Notifier` sinks for logs and WebSocket sessions
//!
//! Adapters translate between domain types and their backing representation.
//! They contain no console rules.

pub mod memory;
pub mod notifications;

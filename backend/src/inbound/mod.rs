//! Inbound adapters translating HTTP and WebSocket traffic into console calls.
//!
//! REST handlers live under [`http`]; the live admin console runs over [`ws`].

pub mod http;
pub mod ws;

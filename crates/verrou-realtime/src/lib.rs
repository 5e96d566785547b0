//! # verrou-realtime
//!
//! Tracks WebSocket connections and routes server events to per-user
//! rooms or to everyone. The transport itself lives in the API crate.

pub mod handle;
pub mod hub;
pub mod message;

pub use handle::{ConnectionHandle, ConnectionId};
pub use hub::RealtimeHub;
pub use message::{EventName, InboundMessage, ServerEvent};

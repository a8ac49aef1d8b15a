// Transport layer for the DevTools channel.
//
// The browser exposes a single WebSocket endpoint. The transport is split
// into sender and receiver halves so the connection can pump incoming
// messages on a background task while commands are sent from callers.

use crate::Result;
use serde_json::Value as JsonValue;
use std::future::Future;
use std::pin::Pin;

pub mod websocket;

pub use websocket::WebSocketTransport;

/// Trait for the sending half of a transport
pub trait TransportSender: Send + Unpin {
    fn send(&mut self, message: JsonValue)
    -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Trait for the receiving half of a transport
pub trait TransportReceiver: Send + Unpin {
    /// Run the receive loop
    fn run(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

//! Command/response connection over the DevTools channel
//!
//! Every command carries a monotonically increasing id; the browser answers
//! with a message carrying the same id. Unsolicited events are traced and
//! dropped; the probe's wait conditions poll instead of consuming events.

use crate::error::{Error, Result};
use crate::server::transport::{TransportReceiver, TransportSender};
use parking_lot::Mutex as ParkingLotMutex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use tokio::sync::Mutex as TokioMutex;
use tokio::sync::{mpsc, oneshot};

/// Command message sent to the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Command {
    pub id: u32,
    pub method: String,
    #[serde(skip_serializing_if = "is_value_null")]
    pub params: Value,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

fn is_value_null(v: &Value) -> bool {
    v.is_null()
}

/// Response message from the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    pub id: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// Unsolicited event emitted by the browser
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Message {
    Response(Response),
    Event(Event),
}

type CallbackRegistry = HashMap<u32, oneshot::Sender<Result<Value>>>;

/// Id-matched connection to the browser
pub struct Connection {
    last_id: AtomicU32,
    callbacks: Arc<ParkingLotMutex<CallbackRegistry>>,
    sender: TokioMutex<Box<dyn TransportSender>>,
    message_rx: TokioMutex<Option<mpsc::UnboundedReceiver<Value>>>,
    transport_receiver: TokioMutex<Option<Box<dyn TransportReceiver>>>,
    closed: AtomicBool,
}

impl Connection {
    pub fn new(
        sender: impl TransportSender + 'static,
        receiver: impl TransportReceiver + 'static,
        message_rx: mpsc::UnboundedReceiver<Value>,
    ) -> Self {
        Self {
            last_id: AtomicU32::new(0),
            callbacks: Arc::new(ParkingLotMutex::new(HashMap::new())),
            sender: TokioMutex::new(Box::new(sender)),
            message_rx: TokioMutex::new(Some(message_rx)),
            transport_receiver: TokioMutex::new(Some(Box::new(receiver))),
            closed: AtomicBool::new(false),
        }
    }

    /// Sends a command and awaits the matching response.
    ///
    /// `session_id` scopes the command to an attached page target; `None`
    /// addresses the browser itself.
    pub async fn send_command(
        &self,
        session_id: Option<&str>,
        method: &str,
        params: Value,
    ) -> Result<Value> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::ChannelClosed);
        }

        let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;

        tracing::debug!(id, method, session = session_id, "sending command");

        let (tx, rx) = oneshot::channel();
        self.callbacks.lock().insert(id, tx);

        // The dispatch loop may have ended between the check above and the
        // insert; the callback would never be drained in that case
        if self.closed.load(Ordering::SeqCst) {
            self.callbacks.lock().remove(&id);
            return Err(Error::ChannelClosed);
        }

        let command = Command {
            id,
            method: method.to_string(),
            params,
            session_id: session_id.map(str::to_string),
        };

        let command_value = serde_json::to_value(&command)?;

        if let Err(e) = self.sender.lock().await.send(command_value).await {
            self.callbacks.lock().remove(&id);
            tracing::error!(id, method, error = %e, "failed to send command");
            return Err(e);
        }

        rx.await
            .map_err(|_| Error::ChannelClosed)
            .and_then(|result| result)
    }

    /// Runs the message loop until the transport closes.
    ///
    /// Can only be called once; the browser session spawns this on a
    /// background task and aborts it on close.
    pub async fn run(self: Arc<Self>) {
        let mut transport_receiver = self
            .transport_receiver
            .lock()
            .await
            .take()
            .expect("run() can only be called once - transport receiver already taken");

        let transport_handle = tokio::spawn(async move {
            if let Err(e) = transport_receiver.run().await {
                tracing::error!("Transport error: {}", e);
            }
        });

        let mut message_rx = self
            .message_rx
            .lock()
            .await
            .take()
            .expect("run() can only be called once - message receiver already taken");

        while let Some(message_value) = message_rx.recv().await {
            match serde_json::from_value::<Message>(message_value) {
                Ok(message) => self.dispatch(message),
                Err(e) => {
                    tracing::error!("Failed to parse message: {}", e);
                }
            }
        }

        tracing::debug!("Message loop ended (transport closed)");
        self.closed.store(true, Ordering::SeqCst);

        // Fail any caller still waiting for a response
        let pending: Vec<_> = {
            let mut callbacks = self.callbacks.lock();
            callbacks.drain().collect()
        };
        for (id, tx) in pending {
            tracing::debug!(id, "dropping pending command after transport close");
            let _ = tx.send(Err(Error::ChannelClosed));
        }

        let _ = transport_handle.await;
    }

    fn dispatch(&self, message: Message) {
        match message {
            Message::Response(response) => {
                let callback = self.callbacks.lock().remove(&response.id);
                match callback {
                    Some(callback) => {
                        let result = if let Some(payload) = response.error {
                            Err(parse_protocol_error(payload))
                        } else {
                            Ok(response.result.unwrap_or(Value::Null))
                        };
                        let _ = callback.send(result);
                    }
                    None => {
                        tracing::warn!(id = response.id, "response for unknown command id");
                    }
                }
            }
            Message::Event(event) => {
                // The probe consumes no events; readiness is expressed by
                // polling wait conditions.
                tracing::trace!(method = %event.method, "ignoring browser event");
            }
        }
    }
}

fn parse_protocol_error(payload: ErrorPayload) -> Error {
    let mut message = format!("{} (code {})", payload.message, payload.code);
    if let Some(data) = payload.data {
        message.push_str(": ");
        message.push_str(&data);
    }
    Error::ProtocolError(message)
}

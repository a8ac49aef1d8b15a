// Mock DevTools endpoint for integration tests
//
// Serves a scripted WebSocket endpoint speaking just enough of the DevTools
// protocol for a probe run: target creation/attachment, navigation,
// evaluation, input, screenshots, and close. Responses come from a
// per-test behavior script, and every handled command is recorded so tests
// can assert ordering (e.g. the dark capture happens strictly after the
// toggle click). This keeps the suite deterministic and browser-free.

// Note: Functions appear "unused" because each test binary compiles
// separately, but they ARE used across multiple test files.
#![allow(dead_code)]

use axum::{
    Router,
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// A valid 1x1 PNG, base64-encoded, returned for screenshot captures
pub const SCREENSHOT_BASE64: &str =
    "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// Scripted behavior for one mock endpoint
#[derive(Debug, Clone)]
pub struct MockBehavior {
    /// `errorText` returned by Page.navigate (None = navigation succeeds)
    pub navigate_error: Option<String>,
    /// Successive answers to visibility polls; the last value repeats
    pub visibility: Vec<bool>,
    /// Successive answers to attribute polls; the last value repeats.
    /// `None` models a missing element or attribute.
    pub attribute_values: Vec<Option<String>>,
    /// Center point reported for click-point queries (None = element missing)
    pub click_point: Option<(f64, f64)>,
    /// Reject this method with a protocol error: (method, message)
    pub fail_method: Option<(String, String)>,
    /// Emit an unsolicited event before the first response
    pub event_before_response: bool,
    /// Close the WebSocket right after answering this method
    pub close_after: Option<String>,
}

impl Default for MockBehavior {
    fn default() -> Self {
        Self {
            navigate_error: None,
            visibility: vec![true],
            attribute_values: vec![Some("dark".to_string())],
            click_point: Some((240.0, 64.0)),
            fail_method: None,
            event_before_response: false,
            close_after: None,
        }
    }
}

struct MockCdpState {
    behavior: MockBehavior,
    visibility_idx: usize,
    attribute_idx: usize,
    event_sent: bool,
    calls: Vec<String>,
}

/// Mock endpoint handle
pub struct MockCdp {
    addr: SocketAddr,
    handle: JoinHandle<()>,
    state: Arc<Mutex<MockCdpState>>,
}

impl MockCdp {
    /// Start the mock endpoint on a random available port
    pub async fn start(behavior: MockBehavior) -> Self {
        let state = Arc::new(Mutex::new(MockCdpState {
            behavior,
            visibility_idx: 0,
            attribute_idx: 0,
            event_sent: false,
            calls: Vec::new(),
        }));

        let app = Router::new()
            .route("/cdp", get(ws_handler))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock endpoint");
        let addr = listener.local_addr().expect("Failed to get local address");

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Mock endpoint failed");
        });

        MockCdp {
            addr,
            handle,
            state,
        }
    }

    /// WebSocket URL of the mock endpoint
    pub fn url(&self) -> String {
        format!("ws://{}/cdp", self.addr)
    }

    /// Every handled command, in arrival order.
    ///
    /// Runtime.evaluate calls are classified by what they query:
    /// `evaluate:visibility`, `evaluate:attribute`, `evaluate:click-point`,
    /// `evaluate:count`.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Whether the session was released with Browser.close
    pub fn was_closed(&self) -> bool {
        self.calls().iter().any(|call| call == "Browser.close")
    }

    /// Index of the nth occurrence of a call, if present
    pub fn call_index(&self, call: &str, nth: usize) -> Option<usize> {
        self.calls()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.as_str() == call)
            .map(|(i, _)| i)
            .nth(nth)
    }

    /// Shutdown the mock endpoint
    pub fn shutdown(self) {
        self.handle.abort();
    }
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<Mutex<MockCdpState>>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(mut socket: WebSocket, state: Arc<Mutex<MockCdpState>>) {
    while let Some(Ok(message)) = socket.recv().await {
        let Message::Text(text) = message else {
            continue;
        };
        let command: Value = match serde_json::from_str(text.as_str()) {
            Ok(value) => value,
            Err(_) => continue,
        };

        let (reply, event, close_after_reply) = {
            let mut state = state.lock().unwrap();
            respond(&mut state, &command)
        };

        if let Some(event) = event {
            if socket
                .send(Message::Text(event.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }

        if socket
            .send(Message::Text(reply.to_string().into()))
            .await
            .is_err()
        {
            break;
        }

        if close_after_reply {
            break;
        }
    }
}

fn respond(state: &mut MockCdpState, command: &Value) -> (Value, Option<Value>, bool) {
    let id = command["id"].as_u64().unwrap_or(0);
    let method = command["method"].as_str().unwrap_or_default().to_string();
    let close_after_reply = state.behavior.close_after.as_deref() == Some(method.as_str());

    let label = if method == "Runtime.evaluate" {
        let expression = command["params"]["expression"].as_str().unwrap_or_default();
        classify_expression(expression).to_string()
    } else {
        method.clone()
    };
    state.calls.push(label.clone());

    let event = if state.behavior.event_before_response && !state.event_sent {
        state.event_sent = true;
        Some(json!({
            "method": "Target.targetCreated",
            "params": { "targetInfo": { "targetId": "page-1", "type": "page" } },
        }))
    } else {
        None
    };

    if let Some((fail_method, message)) = &state.behavior.fail_method {
        if *fail_method == method {
            let reply = json!({
                "id": id,
                "error": { "code": -32000, "message": message },
            });
            return (reply, event, close_after_reply);
        }
    }

    let result = match method.as_str() {
        "Target.createTarget" => json!({ "targetId": "page-1" }),
        "Target.attachToTarget" => json!({ "sessionId": "session-1" }),
        "Page.navigate" => match &state.behavior.navigate_error {
            Some(error_text) => json!({
                "frameId": "frame-1",
                "loaderId": "loader-1",
                "errorText": error_text,
            }),
            None => json!({ "frameId": "frame-1", "loaderId": "loader-1" }),
        },
        "Runtime.evaluate" => evaluate_result(state, &label),
        "Page.captureScreenshot" => json!({ "data": SCREENSHOT_BASE64 }),
        _ => json!({}),
    };

    (json!({ "id": id, "result": result }), event, close_after_reply)
}

fn classify_expression(expression: &str) -> &'static str {
    if expression.contains("scrollIntoView") {
        "evaluate:click-point"
    } else if expression.contains("getAttribute") {
        "evaluate:attribute"
    } else if expression.contains("getComputedStyle") {
        "evaluate:visibility"
    } else if expression.contains("querySelectorAll") {
        "evaluate:count"
    } else {
        "evaluate:other"
    }
}

fn evaluate_result(state: &mut MockCdpState, label: &str) -> Value {
    let value = match label {
        "evaluate:visibility" => {
            let visible = next(&state.behavior.visibility, &mut state.visibility_idx)
                .copied()
                .unwrap_or(true);
            json!(visible)
        }
        "evaluate:attribute" => {
            match next(&state.behavior.attribute_values, &mut state.attribute_idx) {
                Some(Some(class)) => json!(class),
                _ => Value::Null,
            }
        }
        "evaluate:click-point" => match state.behavior.click_point {
            Some((x, y)) => json!({ "x": x, "y": y }),
            None => Value::Null,
        },
        "evaluate:count" => json!(1),
        _ => Value::Null,
    };
    json!({ "result": { "type": "object", "value": value } })
}

fn next<'a, T>(values: &'a [T], idx: &mut usize) -> Option<&'a T> {
    if values.is_empty() {
        return None;
    }
    let i = (*idx).min(values.len() - 1);
    *idx += 1;
    Some(&values[i])
}

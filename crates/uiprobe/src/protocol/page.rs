// Page context
//
// A Page is one navigable browsing context inside a browser session: a
// DevTools target plus the session id used to scope commands to it. It
// issues navigation, JavaScript evaluation, and screenshot captures; element
// queries go through [`Locator`].

use crate::error::{Error, Result};
use crate::protocol::{Locator, ScreenshotOptions};
use crate::server::connection::Connection;
use base64::prelude::*;
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// A single navigable browsing context within a browser session
#[derive(Clone)]
pub struct Page {
    connection: Arc<Connection>,
    target_id: Arc<str>,
    session_id: Arc<str>,
}

impl Page {
    pub(crate) fn new(connection: Arc<Connection>, target_id: String, session_id: String) -> Self {
        Self {
            connection,
            target_id: Arc::from(target_id.as_str()),
            session_id: Arc::from(session_id.as_str()),
        }
    }

    /// The DevTools target id backing this page
    pub fn target_id(&self) -> &str {
        &self.target_id
    }

    /// Navigates the page to the given URL.
    ///
    /// Returns a navigation error if the target does not respond or answers
    /// with a fatal network error. Readiness of the loaded document is not
    /// awaited here; express it with a wait condition on a locator.
    pub async fn goto(&self, url: &str, options: Option<GotoOptions>) -> Result<()> {
        let timeout = options
            .and_then(|o| o.timeout)
            .unwrap_or(Duration::from_millis(crate::DEFAULT_TIMEOUT_MS));

        tracing::debug!(url, "navigating");

        let navigate = self.send("Page.navigate", json!({ "url": url }));
        let result = tokio::time::timeout(timeout, navigate)
            .await
            .map_err(|_| Error::NavigationTimeout {
                url: url.to_string(),
                duration_ms: timeout.as_millis() as u64,
            })??;

        if let Some(error_text) = result["errorText"].as_str() {
            if !error_text.is_empty() {
                return Err(Error::Navigation {
                    url: url.to_string(),
                    message: error_text.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Creates a locator for the given CSS selector.
    ///
    /// Locators are lazy: nothing is queried until an action or condition
    /// runs against them.
    pub fn locator(&self, selector: impl Into<String>) -> Locator {
        Locator::new(self.clone(), selector.into())
    }

    /// Evaluates a JavaScript expression in the page and returns its value.
    ///
    /// The result must be JSON-serializable (the evaluation requests
    /// return-by-value).
    pub async fn evaluate(&self, expression: &str) -> Result<Value> {
        let result = self
            .send(
                "Runtime.evaluate",
                json!({
                    "expression": expression,
                    "returnByValue": true,
                    "awaitPromise": true,
                }),
            )
            .await?;

        if let Some(exception) = result.get("exceptionDetails") {
            let description = exception["exception"]["description"]
                .as_str()
                .or_else(|| exception["text"].as_str())
                .unwrap_or("unknown evaluation error");
            return Err(Error::ProtocolError(format!(
                "evaluation threw: {}",
                description
            )));
        }

        Ok(result["result"]["value"].clone())
    }

    /// Takes a screenshot and returns the image bytes.
    pub async fn screenshot(&self, options: Option<ScreenshotOptions>) -> Result<Vec<u8>> {
        let params = options.unwrap_or_default().to_params();
        let result = self.send("Page.captureScreenshot", params).await?;

        let data = result["data"].as_str().ok_or_else(|| {
            Error::ProtocolError("Page.captureScreenshot response missing 'data'".to_string())
        })?;

        BASE64_STANDARD
            .decode(data)
            .map_err(|e| Error::ProtocolError(format!("Failed to decode screenshot: {}", e)))
    }

    /// Takes a screenshot and writes it to a file, also returning the bytes.
    ///
    /// The file is overwritten if it exists. With the `artifact-verify`
    /// feature the captured image is decoded before the write and rejected
    /// if unreadable, so a broken capture never lands on disk.
    pub async fn screenshot_to_file(
        &self,
        path: &Path,
        options: Option<ScreenshotOptions>,
    ) -> Result<Vec<u8>> {
        let bytes = self.screenshot(options).await?;

        #[cfg(feature = "artifact-verify")]
        crate::protocol::screenshot::verify_artifact(&bytes, path)?;

        tokio::fs::write(path, &bytes)
            .await
            .map_err(|e| Error::Artifact {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::debug!(path = %path.display(), bytes = bytes.len(), "artifact written");

        Ok(bytes)
    }

    /// Dispatches a raw input event to the page.
    pub(crate) async fn dispatch_mouse_event(&self, params: Value) -> Result<()> {
        self.send("Input.dispatchMouseEvent", params).await?;
        Ok(())
    }

    async fn send(&self, method: &str, params: Value) -> Result<Value> {
        self.connection
            .send_command(Some(&self.session_id), method, params)
            .await
    }
}

/// Options for [`Page::goto`]
#[derive(Debug, Clone, Default)]
pub struct GotoOptions {
    /// Maximum time for the navigation to be accepted by the browser
    pub timeout: Option<Duration>,
}

impl GotoOptions {
    /// Creates new GotoOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the navigation timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

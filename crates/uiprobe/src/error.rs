// Error types for uiprobe

use thiserror::Error;

/// Result type alias for uiprobe operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a probe
#[derive(Debug, Error)]
pub enum Error {
    /// No Chromium/Chrome executable could be located
    ///
    /// The probe searched the `UIPROBE_CHROMIUM` environment variable, the
    /// `PATH`, and the well-known install locations for the current platform.
    #[error(
        "No Chromium executable found. Install Chromium or point UIPROBE_CHROMIUM at an executable."
    )]
    BrowserNotFound,

    /// Failed to launch the browser process
    ///
    /// Common causes: executable not runnable, missing system libraries, or
    /// the process exiting before it advertised a DevTools endpoint.
    /// Details: {0}
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to establish the DevTools connection
    #[error("Failed to connect to browser endpoint: {0}")]
    ConnectionFailed(String),

    /// Transport-level error (WebSocket communication)
    #[error("Transport error: {0}")]
    TransportError(String),

    /// Protocol-level error (malformed or rejected DevTools message)
    #[error("Protocol error: {0}")]
    ProtocolError(String),

    /// Navigation was rejected by the browser
    ///
    /// The target did not respond or returned a fatal network error
    /// (e.g. `net::ERR_CONNECTION_REFUSED`).
    #[error("Navigation to '{url}' failed: {message}")]
    Navigation { url: String, message: String },

    /// Navigation did not complete within the configured timeout
    #[error("Navigation timeout after {duration_ms}ms navigating to '{url}'")]
    NavigationTimeout { url: String, duration_ms: u64 },

    /// Timeout waiting for an operation
    ///
    /// Contains context about what operation timed out and the timeout
    /// duration. Wait-condition timeouts use [`Error::AssertionTimeout`];
    /// this variant covers launch/attach deadlines and similar.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// A wait condition was not met in time (expect API)
    #[error("Assertion timeout: {0}")]
    AssertionTimeout(String),

    /// Element not found by selector
    ///
    /// Raised by interactions that require the element to exist at
    /// invocation time. Wait conditions re-poll instead of raising this.
    #[error("Element not found: selector '{0}'")]
    ElementNotFound(String),

    /// Artifact could not be written or failed verification
    #[error("Artifact '{path}' failed: {message}")]
    Artifact { path: String, message: String },

    /// Target was closed (browser or page)
    ///
    /// Occurs when attempting to perform an operation on a closed target.
    #[error("Target closed: Cannot perform operation on closed {target_type}. {context}")]
    TargetClosed {
        target_type: String,
        context: String,
    },

    /// Channel closed unexpectedly
    #[error("Channel closed unexpectedly")]
    ChannelClosed,

    /// Invalid argument provided to method
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error with additional context
    #[error("{0}: {1}")]
    Context(String, #[source] Box<Error>),
}

impl Error {
    /// Adds context to the error
    pub fn context(self, msg: impl Into<String>) -> Self {
        Error::Context(msg.into(), Box::new(self))
    }

    /// True for the TimeoutError class of failures (wait conditions and
    /// bounded operations that did not resolve in time).
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            Error::Timeout(_) | Error::AssertionTimeout(_) | Error::NavigationTimeout { .. }
        ) || matches!(self, Error::Context(_, inner) if inner.is_timeout())
    }

    /// True for the NavigationError class of failures.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Error::Navigation { .. } | Error::NavigationTimeout { .. }
        ) || matches!(self, Error::Context(_, inner) if inner.is_navigation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_source() {
        let err = Error::ElementNotFound("#toggle".to_string()).context("interact step");
        assert_eq!(
            err.to_string(),
            "interact step: Element not found: selector '#toggle'"
        );
    }

    #[test]
    fn test_error_classes() {
        assert!(Error::AssertionTimeout("visibility".into()).is_timeout());
        assert!(
            Error::NavigationTimeout {
                url: "http://localhost".into(),
                duration_ms: 100,
            }
            .is_timeout()
        );
        assert!(
            Error::Navigation {
                url: "http://localhost".into(),
                message: "net::ERR_CONNECTION_REFUSED".into(),
            }
            .is_navigation()
        );
        assert!(!Error::ChannelClosed.is_timeout());
        assert!(
            Error::AssertionTimeout("class".into())
                .context("wait step")
                .is_timeout()
        );
    }
}

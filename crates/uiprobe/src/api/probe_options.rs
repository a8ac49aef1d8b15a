// Probe runner options

use crate::api::LaunchOptions;
use std::time::Duration;

/// Default polling interval for wait conditions (100ms)
pub(crate) const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for [`Runner`](crate::Runner)
///
/// By default the runner launches its own headless browser. `connect` can
/// point it at an already-running DevTools endpoint instead, in which case
/// no process is spawned (the session is still closed at the end of the
/// run).
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// How to launch the browser when no endpoint is given
    pub launch: LaunchOptions,
    /// DevTools WebSocket endpoint of an already-running browser
    pub connect: Option<String>,
    /// Polling interval for wait conditions
    pub poll_interval: Duration,
}

impl ProbeOptions {
    /// Creates a new ProbeOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the launch options used when spawning a browser
    pub fn launch(mut self, launch: LaunchOptions) -> Self {
        self.launch = launch;
        self
    }

    /// Attaches to an existing browser at the given WebSocket endpoint
    pub fn connect(mut self, ws_url: impl Into<String>) -> Self {
        self.connect = Some(ws_url.into());
        self
    }

    /// Sets the polling interval for wait conditions
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            launch: LaunchOptions::default(),
            connect: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_launch_a_fresh_browser() {
        let options = ProbeOptions::new();
        assert!(options.connect.is_none());
        assert_eq!(options.poll_interval, Duration::from_millis(100));
    }

    #[test]
    fn test_connect_overrides_launch() {
        let options = ProbeOptions::new().connect("ws://127.0.0.1:9222/devtools/browser/abc");
        assert_eq!(
            options.connect.as_deref(),
            Some("ws://127.0.0.1:9222/devtools/browser/abc")
        );
    }
}

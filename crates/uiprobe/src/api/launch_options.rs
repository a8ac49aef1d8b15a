// Launch options for Browser::launch()

use std::path::PathBuf;
use std::time::Duration;

/// Options for launching a headless browser
///
/// # Example
///
/// ```ignore
/// use uiprobe::LaunchOptions;
/// use std::time::Duration;
///
/// let options = LaunchOptions::new()
///     .headless(true)
///     .arg("--disable-dev-shm-usage")
///     .launch_timeout(Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Run without a visible window (default: true)
    pub headless: bool,
    /// Path to a specific browser executable, bypassing discovery
    pub executable: Option<PathBuf>,
    /// Additional arguments appended to the browser command line
    pub args: Vec<String>,
    /// How long to wait for the browser to advertise its DevTools endpoint
    pub launch_timeout: Duration,
}

impl LaunchOptions {
    /// Creates a new LaunchOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets headless mode
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets an explicit browser executable
    pub fn executable(mut self, path: impl Into<PathBuf>) -> Self {
        self.executable = Some(path.into());
        self
    }

    /// Appends an extra command-line argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Sets the launch deadline
    pub fn launch_timeout(mut self, timeout: Duration) -> Self {
        self.launch_timeout = timeout;
        self
    }
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: true,
            executable: None,
            args: Vec::new(),
            launch_timeout: Duration::from_millis(crate::DEFAULT_TIMEOUT_MS),
        }
    }
}

//! uiprobe: scripted UI verification probes over headless Chromium
//!
//! A probe navigates a running web application, waits for conditions with
//! bounded timeouts, captures screenshots as artifacts, performs
//! state-changing interactions, and guarantees release of the browser
//! session on every exit path.
//!
//! # Examples
//!
//! ## Theme-toggle verification
//!
//! ```ignore
//! use uiprobe::{Runner, Step};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let steps = vec![
//!         Step::navigate("/"),
//!         Step::wait_for_visible("#main-content", Duration::from_secs(20)),
//!         Step::capture("light_mode.png"),
//!         Step::click("#theme_toggle"),
//!         Step::wait_for_class("body", "dark", Duration::from_secs(5)),
//!         Step::capture("dark_mode.png"),
//!     ];
//!
//!     let report = Runner::new().run("http://localhost:8154/", &steps).await;
//!     for artifact in report.artifacts() {
//!         println!("captured {}", artifact.display());
//!     }
//!     report.into_result()?;
//!     Ok(())
//! }
//! ```
//!
//! ## Driving the session directly
//!
//! ```ignore
//! use uiprobe::{expect, Browser, LaunchOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let browser = Browser::launch(&LaunchOptions::new()).await?;
//!     let page = browser.new_page().await?;
//!
//!     page.goto("http://localhost:8154/", None).await?;
//!     expect(page.locator("#main-content"))
//!         .with_timeout(Duration::from_secs(20))
//!         .to_be_visible()
//!         .await?;
//!     page.screenshot_to_file(std::path::Path::new("light_mode.png"), None).await?;
//!
//!     browser.close().await?;
//!     Ok(())
//! }
//! ```

// Internal modules (exposed for integration tests)
#[doc(hidden)]
pub mod server;

pub mod api;
mod error;
mod expect;
pub mod probe;
pub mod protocol;

/// Default timeout in milliseconds for navigation and launch deadlines.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

// Re-export error types
pub use error::{Error, Result};

// Re-export the expectation API
pub use expect::{Expectation, expect};

// Re-export the probe runner API
pub use probe::{Action, ProbeReport, ProbeState, Runner, Step, StepFailure};

// Re-export the browser session API
pub use protocol::{Browser, GotoOptions, Locator, Page};

// Re-export screenshot types
pub use protocol::{ScreenshotClip, ScreenshotOptions, ScreenshotType};

// Re-export option types
pub use api::{LaunchOptions, ProbeOptions};

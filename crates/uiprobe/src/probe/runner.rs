// Verification probe runner
//
// Drives a scripted step sequence against a running target application.
// Steps run strictly sequentially; the first failure aborts the remainder.
// Whatever happens, the browser session is released before the runner
// returns: normal completion, step failure, and session-level errors all
// pass through the same release path.

use crate::api::ProbeOptions;
use crate::error::{Error, Result};
use crate::expect::expect;
use crate::probe::{ProbeReport, ProbeState, Step};
use crate::protocol::{Browser, Page, ScreenshotOptions};
use url::Url;

/// Runs probe sequences, one browser session per run
///
/// # Example
///
/// ```ignore
/// use uiprobe::{Runner, Step};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let steps = vec![
///         Step::navigate("/"),
///         Step::wait_for_visible("#main-content", Duration::from_secs(20)),
///         Step::capture("light_mode.png"),
///         Step::click("#theme_toggle"),
///         Step::wait_for_class("body", "dark", Duration::from_secs(5)),
///         Step::capture("dark_mode.png"),
///     ];
///
///     let report = Runner::new().run("http://localhost:8154/", &steps).await;
///     let artifacts = report.into_result()?;
///     println!("captured {} artifacts", artifacts.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Default)]
pub struct Runner {
    options: ProbeOptions,
}

impl Runner {
    /// Creates a runner with default options (launch a fresh headless browser).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner with the given options.
    pub fn with_options(options: ProbeOptions) -> Self {
        Self { options }
    }

    /// Runs the step sequence against `target_url`.
    ///
    /// Acquires a browser session, executes the steps in order, and releases
    /// the session on every exit path. Step errors are caught here, logged,
    /// and recorded in the returned [`ProbeReport`]; they do not propagate.
    pub async fn run(&self, target_url: &str, steps: &[Step]) -> ProbeReport {
        let mut report = ProbeReport::new(target_url);

        tracing::info!(target_url, steps = steps.len(), "starting probe");

        let browser = match self.acquire_session().await {
            Ok(browser) => browser,
            Err(error) => {
                tracing::error!(error = %error, "failed to acquire browser session");
                report.record_failure(None, error);
                return report;
            }
        };
        report.transition(ProbeState::SessionAcquired);

        let outcome = self
            .execute_sequence(&browser, target_url, steps, &mut report)
            .await;

        if let Err(error) = browser.close().await {
            tracing::warn!(error = %error, "browser session release reported an error");
        }
        report.transition(ProbeState::SessionReleased);

        match outcome {
            Ok(()) => {
                tracing::info!(
                    artifacts = report.artifacts().len(),
                    "probe completed"
                );
            }
            Err((step, error)) => {
                tracing::error!(step, error = %error, "probe failed");
                report.record_failure(step, error);
            }
        }

        report
    }

    async fn acquire_session(&self) -> Result<Browser> {
        match &self.options.connect {
            Some(ws_url) => Browser::connect(ws_url).await,
            None => Browser::launch(&self.options.launch).await,
        }
    }

    async fn execute_sequence(
        &self,
        browser: &Browser,
        target_url: &str,
        steps: &[Step],
        report: &mut ProbeReport,
    ) -> std::result::Result<(), (Option<usize>, Error)> {
        let page = browser.new_page().await.map_err(|e| (None, e))?;

        for (index, step) in steps.iter().enumerate() {
            tracing::debug!(step = index, "executing: {}", step);
            self.execute_step(&page, target_url, step, report)
                .await
                .map_err(|e| (Some(index), e))?;
        }

        Ok(())
    }

    async fn execute_step(
        &self,
        page: &Page,
        target_url: &str,
        step: &Step,
        report: &mut ProbeReport,
    ) -> Result<()> {
        match step {
            Step::Navigate { url } => {
                let resolved = resolve_url(target_url, url)?;
                page.goto(resolved.as_str(), None).await?;
                report.transition(ProbeState::Navigated);
            }
            Step::WaitForVisible { selector, timeout } => {
                report.transition(ProbeState::Waiting);
                expect(page.locator(selector.clone()))
                    .with_timeout(*timeout)
                    .with_poll_interval(self.options.poll_interval)
                    .to_be_visible()
                    .await?;
            }
            Step::WaitForClass {
                selector,
                class,
                timeout,
            } => {
                report.transition(ProbeState::Waiting);
                expect(page.locator(selector.clone()))
                    .with_timeout(*timeout)
                    .with_poll_interval(self.options.poll_interval)
                    .to_have_class(class)
                    .await?;
            }
            Step::WaitForAttribute {
                selector,
                attribute,
                value,
                timeout,
            } => {
                report.transition(ProbeState::Waiting);
                expect(page.locator(selector.clone()))
                    .with_timeout(*timeout)
                    .with_poll_interval(self.options.poll_interval)
                    .to_have_attribute(attribute, value)
                    .await?;
            }
            Step::CaptureArtifact { path } => {
                let options = ScreenshotOptions::builder().full_page(true).build();
                page.screenshot_to_file(path, Some(options)).await?;
                report.record_artifact(path.clone());
                report.transition(ProbeState::Captured);
            }
            Step::Interact { selector, action } => {
                report.transition(ProbeState::Interacting);
                match action {
                    crate::probe::Action::Click => page.locator(selector.clone()).click().await?,
                }
            }
        }
        Ok(())
    }
}

/// Resolves a step URL against the probe target.
fn resolve_url(target_url: &str, candidate: &str) -> Result<Url> {
    if let Ok(absolute) = Url::parse(candidate) {
        return Ok(absolute);
    }
    let base = Url::parse(target_url)
        .map_err(|e| Error::InvalidArgument(format!("invalid target URL '{}': {}", target_url, e)))?;
    base.join(candidate)
        .map_err(|e| Error::InvalidArgument(format!("cannot resolve '{}': {}", candidate, e)))
}

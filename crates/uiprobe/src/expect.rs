// Expectations - Auto-retry wait conditions
//
// Provides the expect() API with auto-retry logic: a condition is re-polled
// until it holds or a bounded timeout elapses.

use crate::error::Result;
use crate::protocol::Locator;
use std::time::Duration;

/// Default timeout for wait conditions (5 seconds)
const DEFAULT_EXPECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default polling interval for wait conditions (100ms)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Creates an expectation for a locator with auto-retry behavior.
///
/// Conditions are re-polled until they hold or time out (default: 5 seconds).
///
/// # Example
///
/// ```ignore
/// use uiprobe::{expect, Browser};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let browser = Browser::launch(&Default::default()).await?;
///     let page = browser.new_page().await?;
///     page.goto("http://localhost:8154/", None).await?;
///
///     expect(page.locator("#main-content"))
///         .with_timeout(Duration::from_secs(20))
///         .to_be_visible()
///         .await?;
///
///     page.locator("#theme_toggle").click().await?;
///
///     expect(page.locator("body"))
///         .to_have_class("dark")
///         .await?;
///
///     browser.close().await?;
///     Ok(())
/// }
/// ```
pub fn expect(locator: Locator) -> Expectation {
    Expectation::new(locator)
}

/// Expectation wraps a locator and provides wait conditions with auto-retry.
pub struct Expectation {
    locator: Locator,
    timeout: Duration,
    poll_interval: Duration,
    negate: bool,
}

// Allow clippy::wrong_self_convention for to_* methods that consume self;
// conditions are chained and consumed.
#[allow(clippy::wrong_self_convention)]
impl Expectation {
    /// Creates a new expectation for the given locator.
    pub(crate) fn new(locator: Locator) -> Self {
        Self {
            locator,
            timeout: DEFAULT_EXPECT_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
            negate: false,
        }
    }

    /// Sets a custom timeout for this condition.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets a custom poll interval for this condition.
    ///
    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Negates the condition.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Waits until the element is visible.
    pub async fn to_be_visible(self) -> Result<()> {
        let start = std::time::Instant::now();
        let selector = self.locator.selector().to_string();

        loop {
            let is_visible = self.locator.is_visible().await?;

            let matches = if self.negate { !is_visible } else { is_visible };

            if matches {
                return Ok(());
            }

            if start.elapsed() >= self.timeout {
                let message = if self.negate {
                    format!(
                        "Expected element '{}' NOT to be visible, but it was visible after {:?}",
                        selector, self.timeout
                    )
                } else {
                    format!(
                        "Expected element '{}' to be visible, but it was not visible after {:?}",
                        selector, self.timeout
                    )
                };
                return Err(crate::error::Error::AssertionTimeout(message));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Waits until the element is hidden (not visible).
    pub async fn to_be_hidden(self) -> Result<()> {
        // Reuse the visibility logic with flipped negation
        let negated = Expectation {
            negate: !self.negate,
            ..self
        };
        negated.to_be_visible().await
    }

    /// Waits until the element's `class` attribute equals `expected` exactly.
    ///
    /// The comparison is against the full attribute string, deliberately
    /// strict: an element with additional classes does not match. A missing
    /// element or missing attribute is treated as not-yet-matching and
    /// re-polled.
    pub async fn to_have_class(self, expected: &str) -> Result<()> {
        let start = std::time::Instant::now();
        let selector = self.locator.selector().to_string();

        loop {
            let actual = self.locator.class_attribute().await?;

            let is_match = actual.as_deref() == Some(expected);
            let matches = if self.negate { !is_match } else { is_match };

            if matches {
                return Ok(());
            }

            if start.elapsed() >= self.timeout {
                let message = if self.negate {
                    format!(
                        "Expected element '{}' NOT to have class '{}', but it did after {:?}",
                        selector, expected, self.timeout
                    )
                } else {
                    format!(
                        "Expected element '{}' to have class '{}', but had {:?} after {:?}",
                        selector, expected, actual, self.timeout
                    )
                };
                return Err(crate::error::Error::AssertionTimeout(message));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Waits until the element's attribute `name` equals `expected` exactly.
    ///
    /// Missing-element semantics match [`to_have_class`](Self::to_have_class).
    pub async fn to_have_attribute(self, name: &str, expected: &str) -> Result<()> {
        let start = std::time::Instant::now();
        let selector = self.locator.selector().to_string();

        loop {
            let actual = self.locator.get_attribute(name).await?;

            let is_match = actual.as_deref() == Some(expected);
            let matches = if self.negate { !is_match } else { is_match };

            if matches {
                return Ok(());
            }

            if start.elapsed() >= self.timeout {
                let message = if self.negate {
                    format!(
                        "Expected element '{}' NOT to have attribute {}='{}', but it did after {:?}",
                        selector, name, expected, self.timeout
                    )
                } else {
                    format!(
                        "Expected element '{}' to have attribute {}='{}', but had {:?} after {:?}",
                        selector, name, expected, actual, self.timeout
                    )
                };
                return Err(crate::error::Error::AssertionTimeout(message));
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expectation_defaults() {
        assert_eq!(DEFAULT_EXPECT_TIMEOUT, Duration::from_secs(5));
        assert_eq!(DEFAULT_POLL_INTERVAL, Duration::from_millis(100));
    }
}

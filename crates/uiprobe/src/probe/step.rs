// Probe steps
//
// One Step is one discrete scripted action in a probe sequence. Steps run
// strictly in order; the first failure aborts the remainder of the sequence.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One discrete scripted action in a probe sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Load a URL in the page context.
    ///
    /// Relative URLs are resolved against the probe's target URL.
    Navigate { url: String },

    /// Suspend until an element matching the selector becomes visible.
    WaitForVisible { selector: String, timeout: Duration },

    /// Poll until the element's `class` attribute equals `class` exactly.
    WaitForClass {
        selector: String,
        class: String,
        timeout: Duration,
    },

    /// Poll until the element's attribute equals `value` exactly.
    WaitForAttribute {
        selector: String,
        attribute: String,
        value: String,
        timeout: Duration,
    },

    /// Capture a full-page screenshot to the given path.
    ///
    /// An existing file at the path is overwritten.
    CaptureArtifact { path: PathBuf },

    /// Perform an action on the element matching the selector.
    ///
    /// Fails immediately if no matching element exists at invocation time.
    Interact { selector: String, action: Action },
}

impl Step {
    /// Navigate to `url` (absolute, or relative to the probe target).
    pub fn navigate(url: impl Into<String>) -> Self {
        Step::Navigate { url: url.into() }
    }

    /// Wait for the element matching `selector` to become visible.
    pub fn wait_for_visible(selector: impl Into<String>, timeout: Duration) -> Self {
        Step::WaitForVisible {
            selector: selector.into(),
            timeout,
        }
    }

    /// Wait for the element's class attribute to equal `class` exactly.
    pub fn wait_for_class(
        selector: impl Into<String>,
        class: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Step::WaitForClass {
            selector: selector.into(),
            class: class.into(),
            timeout,
        }
    }

    /// Wait for the element's attribute to equal `value` exactly.
    pub fn wait_for_attribute(
        selector: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Step::WaitForAttribute {
            selector: selector.into(),
            attribute: attribute.into(),
            value: value.into(),
            timeout,
        }
    }

    /// Capture a full-page screenshot to `path`.
    pub fn capture(path: impl Into<PathBuf>) -> Self {
        Step::CaptureArtifact { path: path.into() }
    }

    /// Click the element matching `selector`.
    pub fn click(selector: impl Into<String>) -> Self {
        Step::Interact {
            selector: selector.into(),
            action: Action::Click,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Navigate { url } => write!(f, "navigate to '{}'", url),
            Step::WaitForVisible { selector, timeout } => {
                write!(f, "wait for '{}' visible within {:?}", selector, timeout)
            }
            Step::WaitForClass {
                selector,
                class,
                timeout,
            } => write!(
                f,
                "wait for '{}' class '{}' within {:?}",
                selector, class, timeout
            ),
            Step::WaitForAttribute {
                selector,
                attribute,
                value,
                timeout,
            } => write!(
                f,
                "wait for '{}' attribute {}='{}' within {:?}",
                selector, attribute, value, timeout
            ),
            Step::CaptureArtifact { path } => write!(f, "capture '{}'", path.display()),
            Step::Interact { selector, action } => {
                write!(f, "{} '{}'", action, selector)
            }
        }
    }
}

/// Interaction performed by [`Step::Interact`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Single left click on the element's center
    Click,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Click => write!(f, "click"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors_match_variants() {
        assert_eq!(
            Step::navigate("/"),
            Step::Navigate {
                url: "/".to_string()
            }
        );
        assert_eq!(
            Step::click("#theme_toggle"),
            Step::Interact {
                selector: "#theme_toggle".to_string(),
                action: Action::Click,
            }
        );
    }

    #[test]
    fn test_display_names_the_action() {
        let step = Step::wait_for_class("body", "dark", Duration::from_secs(5));
        assert_eq!(step.to_string(), "wait for 'body' class 'dark' within 5s");
        assert_eq!(Step::capture("dark_mode.png").to_string(), "capture 'dark_mode.png'");
    }
}

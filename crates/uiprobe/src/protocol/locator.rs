// Locator - Lazy element selector
//
// A Locator represents a way to find an element on the page at any given
// moment. It stores the selector string and a handle to its Page; nothing is
// queried until an action or condition runs against it, which is what makes
// wait conditions re-pollable.
//
// Queries run as JavaScript in the page. Selectors are JSON-escaped before
// being spliced into the expressions, so arbitrary CSS selectors (including
// quotes) are safe.

use crate::error::{Error, Result};
use crate::protocol::Page;
use serde_json::{Value, json};

/// A lazy handle to the element(s) matching a selector
#[derive(Clone)]
pub struct Locator {
    page: Page,
    selector: String,
}

impl Locator {
    /// Creates a new Locator (internal use only)
    ///
    /// Use `page.locator()` to create locators in application code.
    pub(crate) fn new(page: Page, selector: String) -> Self {
        Self { page, selector }
    }

    /// Returns the selector string for this locator
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Number of elements currently matching the selector.
    pub async fn count(&self) -> Result<u64> {
        let expression = format!(
            "document.querySelectorAll({}).length",
            self.selector_literal()
        );
        let value = self.page.evaluate(&expression).await?;
        value.as_u64().ok_or_else(|| {
            Error::ProtocolError(format!("element count query returned {}", value))
        })
    }

    /// Whether the first matching element is currently visible.
    ///
    /// Visible means attached, not `display: none` or `visibility: hidden`,
    /// and with a non-empty bounding box. A missing element is not visible.
    pub async fn is_visible(&self) -> Result<bool> {
        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                const rect = el.getBoundingClientRect();
                return rect.width > 0 && rect.height > 0;
            }})()"#,
            sel = self.selector_literal()
        );
        let value = self.page.evaluate(&expression).await?;
        value.as_bool().ok_or_else(|| {
            Error::ProtocolError(format!("visibility query returned {}", value))
        })
    }

    /// The element's attribute value, or `None` when the element or the
    /// attribute is missing.
    ///
    /// A missing element is reported as `None` rather than an error so that
    /// wait conditions can keep polling while the element renders.
    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                return el ? el.getAttribute({name}) : null;
            }})()"#,
            sel = self.selector_literal(),
            name = Value::String(name.to_string()),
        );
        let value = self.page.evaluate(&expression).await?;
        match value {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => Err(Error::ProtocolError(format!(
                "attribute query returned {}",
                other
            ))),
        }
    }

    /// The element's `class` attribute.
    ///
    /// `None` when the element is missing or carries no class attribute; see
    /// [`get_attribute`](Self::get_attribute).
    pub async fn class_attribute(&self) -> Result<Option<String>> {
        self.get_attribute("class").await
    }

    /// Clicks the center of the first matching element.
    ///
    /// The element is scrolled into view first. Unlike wait conditions,
    /// this does not retry: a missing element at invocation time is an
    /// [`Error::ElementNotFound`].
    pub async fn click(&self) -> Result<()> {
        let expression = format!(
            r#"(() => {{
                const el = document.querySelector({sel});
                if (!el) return null;
                el.scrollIntoView({{ block: 'center', inline: 'center' }});
                const rect = el.getBoundingClientRect();
                return {{ x: rect.left + rect.width / 2, y: rect.top + rect.height / 2 }};
            }})()"#,
            sel = self.selector_literal()
        );
        let point = self.page.evaluate(&expression).await?;

        if point.is_null() {
            return Err(Error::ElementNotFound(self.selector.clone()));
        }

        let (x, y) = match (point["x"].as_f64(), point["y"].as_f64()) {
            (Some(x), Some(y)) => (x, y),
            _ => {
                return Err(Error::ProtocolError(format!(
                    "click point query returned {}",
                    point
                )));
            }
        };

        tracing::debug!(selector = %self.selector, x, y, "clicking element");

        self.page
            .dispatch_mouse_event(json!({
                "type": "mousePressed",
                "x": x,
                "y": y,
                "button": "left",
                "clickCount": 1,
            }))
            .await?;
        self.page
            .dispatch_mouse_event(json!({
                "type": "mouseReleased",
                "x": x,
                "y": y,
                "button": "left",
                "clickCount": 1,
            }))
            .await?;

        Ok(())
    }

    /// The selector as a JavaScript string literal
    fn selector_literal(&self) -> String {
        Value::String(self.selector.clone()).to_string()
    }
}

//! Protocol objects for the browser session
//!
//! [`Browser`] owns the session, [`Page`] is a single browsing context
//! within it, and [`Locator`] is a lazy handle to elements on the page.

mod browser;
mod locator;
mod page;
pub(crate) mod screenshot;

pub use browser::Browser;
pub use locator::Locator;
pub use page::{GotoOptions, Page};
pub use screenshot::{ScreenshotClip, ScreenshotOptions, ScreenshotOptionsBuilder, ScreenshotType};

// Screenshot types and options
//
// Provides configuration for page screenshots and, behind the
// `artifact-verify` feature, a decode check applied to captured artifacts.

use serde::Serialize;

/// Screenshot image format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotType {
    /// PNG format (lossless, supports transparency)
    Png,
    /// JPEG format (lossy compression, smaller file size)
    Jpeg,
}

/// Clip region for screenshot
///
/// Specifies a rectangular region to capture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenshotClip {
    /// X coordinate of clip region origin
    pub x: f64,
    /// Y coordinate of clip region origin
    pub y: f64,
    /// Width of clip region
    pub width: f64,
    /// Height of clip region
    pub height: f64,
}

/// Screenshot options
///
/// Use the builder pattern to construct options:
///
/// # Example
///
/// ```ignore
/// use uiprobe::{ScreenshotOptions, ScreenshotType};
///
/// // Full-page PNG
/// let options = ScreenshotOptions::builder().full_page(true).build();
///
/// // JPEG with quality
/// let options = ScreenshotOptions::builder()
///     .screenshot_type(ScreenshotType::Jpeg)
///     .quality(80)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScreenshotOptions {
    /// Image format (png or jpeg)
    pub screenshot_type: Option<ScreenshotType>,
    /// JPEG quality (0-100), only applies to jpeg format
    pub quality: Option<u8>,
    /// Capture the full scrollable page instead of the viewport
    pub full_page: Option<bool>,
    /// Clip region to capture
    pub clip: Option<ScreenshotClip>,
}

impl ScreenshotOptions {
    /// Create a new builder for ScreenshotOptions
    pub fn builder() -> ScreenshotOptionsBuilder {
        ScreenshotOptionsBuilder::default()
    }

    /// Convert options to DevTools `Page.captureScreenshot` parameters
    pub(crate) fn to_params(&self) -> serde_json::Value {
        let mut params = serde_json::json!({ "format": "png" });

        if let Some(screenshot_type) = &self.screenshot_type {
            params["format"] = match screenshot_type {
                ScreenshotType::Png => serde_json::json!("png"),
                ScreenshotType::Jpeg => serde_json::json!("jpeg"),
            };
        }

        if let Some(quality) = self.quality {
            params["quality"] = serde_json::json!(quality);
        }

        if self.full_page.unwrap_or(false) {
            params["captureBeyondViewport"] = serde_json::json!(true);
        }

        if let Some(clip) = &self.clip {
            params["clip"] = serde_json::json!({
                "x": clip.x,
                "y": clip.y,
                "width": clip.width,
                "height": clip.height,
                "scale": 1,
            });
        }

        params
    }
}

/// Builder for ScreenshotOptions
#[derive(Debug, Clone, Default)]
pub struct ScreenshotOptionsBuilder {
    options: ScreenshotOptions,
}

impl ScreenshotOptionsBuilder {
    /// Sets the image format
    pub fn screenshot_type(mut self, screenshot_type: ScreenshotType) -> Self {
        self.options.screenshot_type = Some(screenshot_type);
        self
    }

    /// Sets JPEG quality (0-100)
    pub fn quality(mut self, quality: u8) -> Self {
        self.options.quality = Some(quality);
        self
    }

    /// Captures the full scrollable page
    pub fn full_page(mut self, full_page: bool) -> Self {
        self.options.full_page = Some(full_page);
        self
    }

    /// Restricts the capture to a clip region
    pub fn clip(mut self, clip: ScreenshotClip) -> Self {
        self.options.clip = Some(clip);
        self
    }

    /// Builds the options
    pub fn build(self) -> ScreenshotOptions {
        self.options
    }
}

/// Rejects artifacts that are not readable images with non-zero dimensions.
#[cfg(feature = "artifact-verify")]
pub(crate) fn verify_artifact(bytes: &[u8], path: &std::path::Path) -> crate::Result<()> {
    let decoded = image::load_from_memory(bytes).map_err(|e| crate::Error::Artifact {
        path: path.display().to_string(),
        message: format!("captured image failed to decode: {}", e),
    })?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(crate::Error::Artifact {
            path: path.display().to_string(),
            message: "captured image has zero dimensions".to_string(),
        });
    }
    Ok(())
}

//! Primary-monitor capture.
//!
//! Template matching and OCR both run on grayscale, so the RGBA capture is
//! converted once here.

use anyhow::{Context, Result};
use image::{DynamicImage, GrayImage};
use tracing::debug;
use xcap::Monitor;

/// Capture the primary monitor as a grayscale frame.
pub fn capture_primary() -> Result<GrayImage> {
    let monitors = Monitor::all().context("failed to enumerate monitors")?;
    let monitor = monitors
        .into_iter()
        .find(|m| m.is_primary().unwrap_or(false))
        .context("no primary monitor found")?;

    let rgba = monitor
        .capture_image()
        .context("failed to capture the primary monitor")?;
    debug!(width = rgba.width(), height = rgba.height(), "Captured screen frame");
    Ok(DynamicImage::ImageRgba8(rgba).to_luma8())
}

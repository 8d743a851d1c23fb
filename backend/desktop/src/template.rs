//! Screen-image template matching.
//!
//! UI elements are located by comparing a reference PNG against the current
//! frame with normalized sum-of-squared-errors matching. A match is the
//! location with the lowest score, accepted only under a threshold.

use std::path::Path;

use anyhow::{Context, Result};
use image::GrayImage;
use imageproc::template_matching::{find_extremes, match_template, MatchTemplateMethod};
use tracing::debug;

use stocksync_core::SyncError;

/// Axis-aligned screen rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Region {
    /// The region of `width` pixels immediately to the right, same height.
    /// Used to read the quantity printed next to the store label.
    pub fn right(&self, width: u32) -> Region {
        Region {
            x: self.x + self.width,
            y: self.y,
            width,
            height: self.height,
        }
    }

    /// Center point, for mouse clicks.
    pub fn center(&self) -> (i32, i32) {
        (
            (self.x + self.width / 2) as i32,
            (self.y + self.height / 2) as i32,
        )
    }
}

/// A reference image for one on-screen UI element.
pub struct Template {
    name: String,
    image: GrayImage,
}

impl Template {
    /// Load a grayscale template from a PNG file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let image = image::open(path)
            .with_context(|| format!("failed to load template image {}", path.display()))?
            .to_luma8();
        Ok(Self { name, image })
    }

    pub fn from_image(name: impl Into<String>, image: GrayImage) -> Self {
        Self {
            name: name.into(),
            image,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Find this template on a frame. `threshold` is the maximum accepted
    /// normalized SSE score (0 is a perfect match).
    pub fn locate(&self, frame: &GrayImage, threshold: f32) -> Result<Region> {
        if self.image.width() > frame.width() || self.image.height() > frame.height() {
            return Err(SyncError::TemplateNotFound {
                name: self.name.clone(),
                score: f32::INFINITY,
            }
            .into());
        }

        let scores = match_template(
            frame,
            &self.image,
            MatchTemplateMethod::SumOfSquaredErrorsNormalized,
        );
        let extremes = find_extremes(&scores);
        debug!(
            template = %self.name,
            score = extremes.min_value,
            at = ?extremes.min_value_location,
            "Template match"
        );

        if extremes.min_value > threshold {
            return Err(SyncError::TemplateNotFound {
                name: self.name.clone(),
                score: extremes.min_value,
            }
            .into());
        }

        let (x, y) = extremes.min_value_location;
        Ok(Region {
            x,
            y,
            width: self.image.width(),
            height: self.image.height(),
        })
    }
}

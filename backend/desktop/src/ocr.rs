//! Text extraction from a screen region via Tesseract.
//!
//! The quantity readout is digits-only, so the engine runs with a numeric
//! character whitelist.

use anyhow::Result;
use image::{GrayImage, ImageFormat};
use tesseract::Tesseract;
use tracing::debug;

use stocksync_core::SyncError;

use crate::template::Region;

const DIGIT_WHITELIST: &str = "0123456789";

/// Tesseract-backed digit reader.
pub struct OcrEngine {
    datapath: Option<String>,
    language: String,
}

impl OcrEngine {
    /// `datapath` points at a tessdata directory; `None` uses the system
    /// default install.
    pub fn new(datapath: Option<String>) -> Self {
        Self {
            datapath,
            language: "eng".to_string(),
        }
    }

    /// Crop `region` out of `frame` and read it as digits.
    pub fn read_digits(&self, frame: &GrayImage, region: Region) -> Result<String> {
        let crop = crop_clamped(frame, region);
        let mut png = Vec::new();
        crop.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| SyncError::OcrFailed(format!("failed to encode crop: {e}")))?;

        let mut tess = Tesseract::new(self.datapath.as_deref(), Some(&self.language))
            .map_err(|e| SyncError::OcrFailed(format!("tesseract init: {e}")))?
            .set_variable("tessedit_char_whitelist", DIGIT_WHITELIST)
            .map_err(|e| SyncError::OcrFailed(format!("tesseract variable: {e}")))?
            .set_image_from_mem(&png)
            .map_err(|e| SyncError::OcrFailed(format!("tesseract set image: {e}")))?;

        let text = tess
            .get_text()
            .map_err(|e| SyncError::OcrFailed(format!("tesseract read: {e}")))?;
        let text = text.trim().to_string();
        debug!(?region, %text, "OCR read");
        Ok(text)
    }
}

/// Crop a region, clamped to the frame bounds.
fn crop_clamped(frame: &GrayImage, region: Region) -> GrayImage {
    let x = region.x.min(frame.width().saturating_sub(1));
    let y = region.y.min(frame.height().saturating_sub(1));
    let width = region.width.min(frame.width() - x).max(1);
    let height = region.height.min(frame.height() - y).max(1);
    image::imageops::crop_imm(frame, x, y, width, height).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn crop_matches_region() {
        let frame = GrayImage::from_fn(20, 10, |x, _| Luma([x as u8]));
        let crop = crop_clamped(&frame, Region { x: 5, y: 2, width: 4, height: 3 });
        assert_eq!((crop.width(), crop.height()), (4, 3));
        assert_eq!(crop.get_pixel(0, 0), &Luma([5u8]));
    }

    #[test]
    fn crop_clamps_to_frame_bounds() {
        let frame = GrayImage::from_pixel(20, 10, Luma([0u8]));
        let crop = crop_clamped(&frame, Region { x: 15, y: 8, width: 100, height: 100 });
        assert_eq!((crop.width(), crop.height()), (5, 2));
    }
}

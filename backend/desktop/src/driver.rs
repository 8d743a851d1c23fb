//! The `PosDriver` implementation for the Retaguarda POS application.
//!
//! Wires process launch, screen capture, template matching, OCR and input
//! into the fixed interaction sequence the sync pass performs.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::sleep;
use tracing::info;

use stocksync_core::PosDriver;

use crate::input::InputDriver;
use crate::ocr::OcrEngine;
use crate::process::AppProcess;
use crate::screen;
use crate::template::Template;

/// Template file names are a fixed contract with the templates directory.
pub const MENU_TEMPLATE: &str = "consulta_resumida_menu.png";
pub const BARCODE_INPUT_TEMPLATE: &str = "barcode_input.png";
pub const STORE_LABEL_TEMPLATE: &str = "store_1_label.png";

/// Everything the driver needs to know about the target application.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub executable: String,
    pub window_title: String,
    pub templates_dir: PathBuf,
    /// Maximum accepted normalized SSE score for a template match.
    pub match_threshold: f32,
    /// Width in pixels of the quantity region to the right of the label.
    pub quantity_region_width: u32,
    pub window_timeout: Duration,
    /// Pause after clicks and lookups for the UI to repaint.
    pub settle_delay: Duration,
    pub tessdata_path: Option<String>,
}

/// Drives the POS application through its summary view.
pub struct RetaguardaDriver {
    config: DriverConfig,
    process: AppProcess,
    menu: Template,
    barcode_input: Template,
    store_label: Template,
    ocr: OcrEngine,
}

impl RetaguardaDriver {
    /// Load templates and prepare the driver. Fails early if any template
    /// image is missing, before the application is touched.
    pub fn new(config: DriverConfig) -> Result<Self> {
        let menu = load_template(&config.templates_dir, MENU_TEMPLATE)?;
        let barcode_input = load_template(&config.templates_dir, BARCODE_INPUT_TEMPLATE)?;
        let store_label = load_template(&config.templates_dir, STORE_LABEL_TEMPLATE)?;
        let process = AppProcess::new(&config.executable, &config.window_title);
        let ocr = OcrEngine::new(config.tessdata_path.clone());
        Ok(Self {
            config,
            process,
            menu,
            barcode_input,
            store_label,
            ocr,
        })
    }

    /// Locate a template on a fresh frame and click its center.
    fn click_template(&self, template: &Template) -> Result<()> {
        let frame = screen::capture_primary()?;
        let region = template.locate(&frame, self.config.match_threshold)?;
        let (x, y) = region.center();
        let mut input = InputDriver::new()?;
        input.click_at(x, y)
    }
}

fn load_template(dir: &Path, file: &str) -> Result<Template> {
    Template::load(dir.join(file))
}

#[async_trait]
impl PosDriver for RetaguardaDriver {
    async fn open(&mut self) -> Result<()> {
        self.process.launch()?;
        self.process.wait_for_window(self.config.window_timeout).await?;
        info!("Navigating to the summary view");
        self.click_template(&self.menu)?;
        sleep(self.config.settle_delay).await;
        Ok(())
    }

    async fn read_store_quantity(&mut self, barcode: &str) -> Result<String> {
        {
            let frame = screen::capture_primary()?;
            let field = self.barcode_input.locate(&frame, self.config.match_threshold)?;
            let (x, y) = field.center();
            let mut input = InputDriver::new()?;
            input.click_at(x, y)?;
            input.type_text(barcode, true)?;
        }
        sleep(self.config.settle_delay).await;

        let frame = screen::capture_primary()?;
        let label = self.store_label.locate(&frame, self.config.match_threshold)?;
        let quantity_region = label.right(self.config.quantity_region_width);
        self.ocr.read_digits(&frame, quantity_region)
    }

    async fn close_all(&mut self) -> Result<()> {
        self.process.close_all().await
    }
}

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use stocksync_desktop::DriverConfig;

/// stocksync runtime configuration.
///
/// Defaults preserve the original deployment's constants; every field can be
/// overridden through `STOCKSYNC_*` environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the Firestore service account key file
    pub service_account_path: String,
    /// Project to target; defaults to the one named in the key file
    pub project_id: Option<String>,
    /// Collection holding the inventory records
    pub collection: String,
    /// POS application executable
    pub app_executable: String,
    /// Expected main window title
    pub window_title: String,
    /// Directory with the UI template PNGs
    pub templates_dir: PathBuf,
    /// Maximum accepted template match score
    pub match_threshold: f32,
    /// Width of the quantity region right of the store label, in pixels
    pub quantity_region_width: u32,
    /// How long to wait for the application window, in seconds
    pub window_timeout_secs: u64,
    /// UI repaint pause after clicks and lookups, in milliseconds
    pub settle_delay_ms: u64,
    /// Optional tessdata directory for the OCR engine
    pub tessdata_path: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_account_path: "serviceAccountKey.json".to_string(),
            project_id: None,
            collection: "batteries".to_string(),
            app_executable: "Retaguarda.exe".to_string(),
            window_title: "Retaguarda".to_string(),
            templates_dir: default_templates_dir(),
            match_threshold: 0.05,
            quantity_region_width: 100,
            window_timeout_secs: 30,
            settle_delay_ms: 750,
            tessdata_path: None,
            log_level: "info".to_string(),
        }
    }
}

fn default_templates_dir() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".stocksync").join("templates"))
        .unwrap_or_else(|| PathBuf::from("templates"))
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_vars(&std::env::vars().collect())
    }

    /// Same as `from_env`, with an injectable variable map for tests.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let defaults = Config::default();
        let get = |key: &str| vars.get(key).filter(|v| !v.is_empty()).cloned();

        Self {
            service_account_path: get("STOCKSYNC_SERVICE_ACCOUNT")
                .unwrap_or(defaults.service_account_path),
            project_id: get("STOCKSYNC_PROJECT_ID"),
            collection: get("STOCKSYNC_COLLECTION").unwrap_or(defaults.collection),
            app_executable: get("STOCKSYNC_APP_EXE").unwrap_or(defaults.app_executable),
            window_title: get("STOCKSYNC_WINDOW_TITLE").unwrap_or(defaults.window_title),
            templates_dir: get("STOCKSYNC_TEMPLATES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.templates_dir),
            match_threshold: get("STOCKSYNC_MATCH_THRESHOLD")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.match_threshold),
            quantity_region_width: get("STOCKSYNC_QUANTITY_REGION_WIDTH")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.quantity_region_width),
            window_timeout_secs: get("STOCKSYNC_WINDOW_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.window_timeout_secs),
            settle_delay_ms: get("STOCKSYNC_SETTLE_DELAY_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.settle_delay_ms),
            tessdata_path: get("STOCKSYNC_TESSDATA"),
            log_level: get("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }

    /// The desktop-driver slice of the configuration.
    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            executable: self.app_executable.clone(),
            window_title: self.window_title.clone(),
            templates_dir: self.templates_dir.clone(),
            match_threshold: self.match_threshold,
            quantity_region_width: self.quantity_region_width,
            window_timeout: Duration::from_secs(self.window_timeout_secs),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            tessdata_path: self.tessdata_path.clone(),
        }
    }
}

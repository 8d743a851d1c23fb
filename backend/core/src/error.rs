use thiserror::Error;

/// Top-level error type for the stocksync runtime.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("store error: {0}")]
    StoreError(String),

    #[error("application window '{0}' did not appear")]
    WindowNotFound(String),

    #[error("template '{name}' not found on screen (best score {score})")]
    TemplateNotFound { name: String, score: f32 },

    #[error("OCR failed: {0}")]
    OcrFailed(String),

    #[error("on-screen quantity '{text}' is not a non-negative integer")]
    BadQuantity { text: String },

    #[error("input injection failed: {0}")]
    InputFailed(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

use anyhow::Result;
use async_trait::async_trait;

use crate::record::InventoryRecord;

/// Remote document store holding the inventory collection.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Fetch every record in the collection.
    async fn fetch_all(&self) -> Result<Vec<InventoryRecord>>;

    /// Write a new quantity back to one record.
    async fn update_quantity(&self, id: &str, quantity: i64) -> Result<()>;
}

/// Driver for the desktop point-of-sale application.
///
/// Implementations interact with a live screen (template matching, OCR,
/// synthetic input), so all methods take `&mut self` and are expected to be
/// called from a single task.
#[async_trait]
pub trait PosDriver: Send {
    /// Launch the application, wait for its main window, and navigate to
    /// the summary view.
    async fn open(&mut self) -> Result<()>;

    /// Type a barcode into the lookup field and return the raw text read
    /// from the quantity region next to the store label.
    ///
    /// Parsing the text is the caller's job; a garbled read must surface
    /// there, not be silently coerced here.
    async fn read_store_quantity(&mut self, barcode: &str) -> Result<String>;

    /// Terminate the application. Called unconditionally at the end of a
    /// pass; must be safe to call even if `open` never succeeded.
    async fn close_all(&mut self) -> Result<()>;
}

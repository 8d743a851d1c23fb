pub mod error;
pub mod record;
pub mod traits;

pub use error::SyncError;
pub use record::InventoryRecord;
pub use traits::{InventoryStore, PosDriver};

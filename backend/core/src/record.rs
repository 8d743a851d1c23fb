use serde::{Deserialize, Serialize};

/// One inventory record as read from the remote collection.
///
/// The record is owned by the store; this is an ephemeral read-then-write
/// view held only for the duration of one sync pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Document id within the collection.
    pub id: String,
    /// Barcode typed into the POS lookup field. May be absent or empty.
    pub barcode: Option<String>,
    /// Last known quantity stored remotely.
    pub quantity: i64,
}

impl InventoryRecord {
    pub fn new(id: impl Into<String>, barcode: Option<String>, quantity: i64) -> Self {
        Self {
            id: id.into(),
            barcode,
            quantity,
        }
    }

    /// The barcode to look up, if the record has a usable one.
    /// An empty string counts as missing.
    pub fn barcode(&self) -> Option<&str> {
        self.barcode.as_deref().filter(|b| !b.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barcode_present() {
        let r = InventoryRecord::new("doc1", Some("789100001".into()), 4);
        assert_eq!(r.barcode(), Some("789100001"));
    }

    #[test]
    fn missing_barcode_is_none() {
        let r = InventoryRecord::new("doc1", None, 4);
        assert_eq!(r.barcode(), None);
    }

    #[test]
    fn empty_barcode_counts_as_missing() {
        let r = InventoryRecord::new("doc1", Some(String::new()), 4);
        assert_eq!(r.barcode(), None);
    }
}

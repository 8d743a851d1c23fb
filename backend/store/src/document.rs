//! Mapping between Firestore REST documents and `InventoryRecord`.
//!
//! Firestore wraps every field in a typed value object (`stringValue`,
//! `integerValue`, ...). Integers come back as decimal strings.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use stocksync_core::InventoryRecord;

/// One document as returned by the `documents.list` endpoint.
#[derive(Debug, Deserialize)]
pub struct Document {
    /// Full resource name, e.g.
    /// `projects/p/databases/(default)/documents/batteries/abc123`.
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

/// A page of the `documents.list` response.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsResponse {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

/// Last path segment of a document resource name.
pub fn doc_id(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)?
        .get("stringValue")?
        .as_str()
        .map(str::to_owned)
}

fn integer_field(fields: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = fields.get(key)?;
    // integerValue is serialized as a string; tolerate a bare number too.
    match value.get("integerValue")? {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

impl Document {
    pub fn into_record(self) -> InventoryRecord {
        let barcode = string_field(&self.fields, "barcode");
        let quantity = integer_field(&self.fields, "quantity").unwrap_or(0);
        InventoryRecord::new(doc_id(&self.name), barcode, quantity)
    }
}

/// Request body for patching just the quantity field.
pub fn quantity_patch_body(quantity: i64) -> Value {
    json!({
        "fields": {
            "quantity": { "integerValue": quantity.to_string() }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(raw: Value) -> Document {
        serde_json::from_value(raw).unwrap()
    }

    #[test]
    fn maps_document_to_record() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/batteries/abc123",
            "fields": {
                "barcode": { "stringValue": "789100001" },
                "quantity": { "integerValue": "12" }
            }
        }));
        let record = d.into_record();
        assert_eq!(record.id, "abc123");
        assert_eq!(record.barcode(), Some("789100001"));
        assert_eq!(record.quantity, 12);
    }

    #[test]
    fn missing_barcode_maps_to_none() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/batteries/abc123",
            "fields": { "quantity": { "integerValue": "3" } }
        }));
        assert_eq!(d.into_record().barcode(), None);
    }

    #[test]
    fn empty_barcode_is_skippable() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/batteries/x",
            "fields": {
                "barcode": { "stringValue": "" },
                "quantity": { "integerValue": "1" }
            }
        }));
        assert_eq!(d.into_record().barcode(), None);
    }

    #[test]
    fn tolerates_missing_fields_object() {
        let d = doc(json!({
            "name": "projects/p/databases/(default)/documents/batteries/y"
        }));
        let record = d.into_record();
        assert_eq!(record.id, "y");
        assert_eq!(record.quantity, 0);
    }

    #[test]
    fn patch_body_wraps_integer_as_string() {
        let body = quantity_patch_body(42);
        assert_eq!(body["fields"]["quantity"]["integerValue"], "42");
    }
}

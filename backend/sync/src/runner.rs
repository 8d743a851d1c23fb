//! The sync pass.
//!
//! Fetch every record, open the POS application once, and for each record
//! with a barcode read the on-screen quantity and write it back. Any error
//! aborts the remaining records; the application is closed exactly once no
//! matter how far the pass got.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{error, info, warn};

use stocksync_core::{InventoryStore, PosDriver, SyncError};

/// Outcome of one pass.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Records fetched from the collection.
    pub fetched: usize,
    /// Records whose quantity was written back.
    pub synced: usize,
    /// Records skipped for having no usable barcode.
    pub skipped: usize,
    /// Error that aborted the pass, if any.
    pub error: Option<String>,
}

impl SyncReport {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse an OCR readout as a stock quantity.
/// Quantities are non-negative integers; anything else is an error.
pub fn parse_quantity(text: &str) -> Result<i64> {
    let trimmed = text.trim();
    let quantity: i64 = trimmed.parse().map_err(|_| SyncError::BadQuantity {
        text: trimmed.to_string(),
    })?;
    if quantity < 0 {
        return Err(SyncError::BadQuantity {
            text: trimmed.to_string(),
        }
        .into());
    }
    Ok(quantity)
}

/// Runs one pass against a store and a POS driver.
pub struct SyncRunner<S: InventoryStore, D: PosDriver> {
    store: S,
    driver: D,
}

struct Progress {
    fetched: usize,
    synced: usize,
    skipped: usize,
}

impl<S: InventoryStore, D: PosDriver> SyncRunner<S, D> {
    pub fn new(store: S, driver: D) -> Self {
        Self { store, driver }
    }

    /// Run the pass. Errors are folded into the report after the
    /// unconditional close step; they never bypass it.
    pub async fn run(&mut self) -> SyncReport {
        let started_at = Utc::now();
        let mut progress = Progress {
            fetched: 0,
            synced: 0,
            skipped: 0,
        };

        let outcome = self.run_inner(&mut progress).await;

        // The cleanup step runs exactly once, success or failure.
        if let Err(e) = self.driver.close_all().await {
            warn!(error = %format!("{e:#}"), "Failed to close the POS application");
        }

        let error = outcome.err().map(|e| {
            error!(error = %format!("{e:#}"), "Sync pass aborted");
            format!("{e:#}")
        });

        let report = SyncReport {
            started_at,
            finished_at: Utc::now(),
            fetched: progress.fetched,
            synced: progress.synced,
            skipped: progress.skipped,
            error,
        };
        info!(
            fetched = report.fetched,
            synced = report.synced,
            skipped = report.skipped,
            ok = report.is_ok(),
            "Sync pass finished"
        );
        report
    }

    async fn run_inner(&mut self, progress: &mut Progress) -> Result<()> {
        let records = self
            .store
            .fetch_all()
            .await
            .context("failed to fetch inventory records")?;
        progress.fetched = records.len();
        info!(count = records.len(), "Fetched inventory records");

        self.driver
            .open()
            .await
            .context("failed to open the POS application")?;

        for record in &records {
            let Some(barcode) = record.barcode() else {
                progress.skipped += 1;
                continue;
            };

            let text = self
                .driver
                .read_store_quantity(barcode)
                .await
                .with_context(|| format!("failed to read quantity for barcode '{barcode}'"))?;
            let quantity = parse_quantity(&text)?;

            self.store
                .update_quantity(&record.id, quantity)
                .await
                .with_context(|| format!("failed to update record '{}'", record.id))?;
            progress.synced += 1;
            info!(barcode, quantity, "Synced quantity");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use stocksync_core::InventoryRecord;

    /// In-memory store recording every update call.
    #[derive(Clone, Default)]
    struct MockStore {
        records: Vec<InventoryRecord>,
        updates: Arc<Mutex<Vec<(String, i64)>>>,
        fail_fetch: bool,
    }

    #[async_trait]
    impl InventoryStore for MockStore {
        async fn fetch_all(&self) -> Result<Vec<InventoryRecord>> {
            if self.fail_fetch {
                anyhow::bail!("store unreachable");
            }
            Ok(self.records.clone())
        }

        async fn update_quantity(&self, id: &str, quantity: i64) -> Result<()> {
            self.updates.lock().unwrap().push((id.to_string(), quantity));
            Ok(())
        }
    }

    /// Scripted driver: maps barcodes to on-screen readouts.
    #[derive(Default)]
    struct MockDriver {
        readouts: HashMap<String, String>,
        fail_open: bool,
        closed: Arc<Mutex<usize>>,
        reads: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl PosDriver for MockDriver {
        async fn open(&mut self) -> Result<()> {
            if self.fail_open {
                anyhow::bail!("window never appeared");
            }
            Ok(())
        }

        async fn read_store_quantity(&mut self, barcode: &str) -> Result<String> {
            self.reads.lock().unwrap().push(barcode.to_string());
            self.readouts
                .get(barcode)
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("no readout scripted for '{barcode}'"))
        }

        async fn close_all(&mut self) -> Result<()> {
            *self.closed.lock().unwrap() += 1;
            Ok(())
        }
    }

    fn record(id: &str, barcode: Option<&str>) -> InventoryRecord {
        InventoryRecord::new(id, barcode.map(str::to_owned), 0)
    }

    #[tokio::test]
    async fn every_barcoded_record_yields_one_write() {
        let store = MockStore {
            records: vec![record("a", Some("111")), record("b", Some("222"))],
            ..Default::default()
        };
        let updates = store.updates.clone();
        let driver = MockDriver {
            readouts: HashMap::from([
                ("111".to_string(), "7".to_string()),
                ("222".to_string(), " 15\n".to_string()),
            ]),
            ..Default::default()
        };
        let reads = driver.reads.clone();

        let report = SyncRunner::new(store, driver).run().await;

        assert!(report.is_ok());
        assert_eq!(report.synced, 2);
        assert_eq!(*reads.lock().unwrap(), vec!["111", "222"]);
        assert_eq!(
            *updates.lock().unwrap(),
            vec![("a".to_string(), 7), ("b".to_string(), 15)]
        );
    }

    #[tokio::test]
    async fn records_without_barcode_are_skipped() {
        let store = MockStore {
            records: vec![
                record("a", None),
                record("b", Some("")),
                record("c", Some("333")),
            ],
            ..Default::default()
        };
        let updates = store.updates.clone();
        let driver = MockDriver {
            readouts: HashMap::from([("333".to_string(), "4".to_string())]),
            ..Default::default()
        };

        let report = SyncRunner::new(store, driver).run().await;

        assert!(report.is_ok());
        assert_eq!(report.skipped, 2);
        assert_eq!(report.synced, 1);
        assert_eq!(*updates.lock().unwrap(), vec![("c".to_string(), 4)]);
    }

    #[tokio::test]
    async fn close_runs_exactly_once_on_success() {
        let store = MockStore::default();
        let driver = MockDriver::default();
        let closed = driver.closed.clone();

        let report = SyncRunner::new(store, driver).run().await;

        assert!(report.is_ok());
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn close_runs_exactly_once_when_open_fails() {
        let store = MockStore {
            records: vec![record("a", Some("111"))],
            ..Default::default()
        };
        let driver = MockDriver {
            fail_open: true,
            ..Default::default()
        };
        let closed = driver.closed.clone();

        let report = SyncRunner::new(store, driver).run().await;

        assert!(!report.is_ok());
        assert_eq!(report.synced, 0);
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn close_runs_exactly_once_when_fetch_fails() {
        let store = MockStore {
            fail_fetch: true,
            ..Default::default()
        };
        let driver = MockDriver::default();
        let closed = driver.closed.clone();

        let report = SyncRunner::new(store, driver).run().await;

        assert!(!report.is_ok());
        assert_eq!(*closed.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn garbled_readout_aborts_remaining_records() {
        let store = MockStore {
            records: vec![
                record("a", Some("111")),
                record("b", Some("222")),
                record("c", Some("333")),
            ],
            ..Default::default()
        };
        let updates = store.updates.clone();
        let driver = MockDriver {
            readouts: HashMap::from([
                ("111".to_string(), "9".to_string()),
                ("222".to_string(), "1O".to_string()), // letter O, not a digit
                ("333".to_string(), "5".to_string()),
            ]),
            ..Default::default()
        };
        let closed = driver.closed.clone();

        let report = SyncRunner::new(store, driver).run().await;

        // The earlier write stands, nothing after the bad read is touched.
        assert!(!report.is_ok());
        assert_eq!(report.synced, 1);
        assert_eq!(*updates.lock().unwrap(), vec![("a".to_string(), 9)]);
        assert_eq!(*closed.lock().unwrap(), 1);
        assert!(report.error.unwrap().contains("1O"));
    }

    #[test]
    fn parse_quantity_trims_whitespace() {
        assert_eq!(parse_quantity(" 42\n").unwrap(), 42);
        assert_eq!(parse_quantity("0").unwrap(), 0);
    }

    #[test]
    fn parse_quantity_rejects_garbage_and_negatives() {
        assert!(parse_quantity("").is_err());
        assert!(parse_quantity("12a").is_err());
        assert!(parse_quantity("-3").is_err());
    }
}

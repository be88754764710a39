//! # Inventory Store
//!
//! The in-memory inventory backed by a single durable file.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  open() ──► [ table in memory ] ──► upsert()/insert()/update()          │
//! │                     ▲                         │                         │
//! │                     │                         ▼ dirty = true            │
//! │                     │                   persist()                        │
//! │                     │                  ┌──────┴──────┐                  │
//! │                     │                  ▼             ▼                  │
//! │                     │           ok: dirty=false   err: dirty stays,     │
//! │                     └────────────────────────────  retried next time    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The store is the single writer of its file. Nothing here reloads the
//! file after `open`; external edits made while a store is live are
//! overwritten by its next persist.

use std::collections::HashMap;
use std::path::Path;

use stockscan_core::validation::{validate_barcode, validate_price, validate_product_name};
use stockscan_core::{InventoryRecord, RecordDefaults, UpsertOutcome};
use tracing::{debug, info, warn};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::table::{read_table, write_table, InventoryTable, StoredRow};

/// Durable, ordered inventory keyed by barcode.
///
/// ## Example
/// ```rust,no_run
/// use stockscan_store::{InventoryStore, StoreConfig};
///
/// # fn main() -> Result<(), stockscan_store::StoreError> {
/// let mut store = InventoryStore::open(StoreConfig::new("inventory.csv"))?;
/// let outcome = store.upsert("4006381333931")?;
/// println!("{} {}", outcome.kind(), outcome.record.code);
/// store.persist()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct InventoryStore {
    config: StoreConfig,
    table: InventoryTable,
    index: HashMap<String, usize>,
    dirty: bool,
}

impl InventoryStore {
    /// Loads the inventory file, or starts empty if it does not exist.
    ///
    /// # Errors
    /// - `StoreError::Corrupt` if the file exists but does not parse
    /// - `StoreError::Unreadable` if the file exists but cannot be read
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        let table = match read_table(&config.path, &config.defaults)? {
            Some(table) => {
                info!(
                    path = %config.path.display(),
                    records = table.len(),
                    "Inventory loaded"
                );
                table
            }
            None => {
                info!(path = %config.path.display(), "No inventory file yet, starting empty");
                InventoryTable::new()
            }
        };

        let index = table
            .records()
            .enumerate()
            .map(|(i, record)| (record.code.clone(), i))
            .collect();

        Ok(InventoryStore {
            config,
            table,
            index,
            dirty: false,
        })
    }

    // =========================================================================
    // Scan Updates
    // =========================================================================

    /// Counts one scan of `code`.
    ///
    /// A known code gains exactly one unit of stock. An unknown code is
    /// appended with the placeholder name, the default price and stock 1.
    /// The change is in memory only until `persist` succeeds.
    pub fn upsert(&mut self, code: &str) -> StoreResult<UpsertOutcome> {
        let code = validate_barcode(code)?;

        if let Some(i) = self.index.get(code).copied() {
            let record = &mut self.table.rows[i].record;
            let stock = record.restock_one()?;
            self.dirty = true;

            debug!(code = %code, stock, "Restocked");
            return Ok(UpsertOutcome::restocked(record.clone()));
        }

        let record = self.config.defaults.new_record(code);
        self.push(record.clone());

        debug!(code = %code, "Added new product");
        Ok(UpsertOutcome::added(record))
    }

    /// Writes the whole table to the durable file.
    ///
    /// On failure the in-memory state is kept and still marked unsaved, so
    /// the next successful persist writes every pending change.
    pub fn persist(&mut self) -> StoreResult<()> {
        match write_table(&self.config.path, &self.table) {
            Ok(()) => {
                self.dirty = false;
                debug!(path = %self.config.path.display(), records = self.table.len(), "Inventory saved");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Inventory save failed, changes kept in memory");
                Err(e)
            }
        }
    }

    /// True if there are changes no successful persist has written yet.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // =========================================================================
    // Manual Edits
    // =========================================================================

    /// Adds a fully specified record.
    ///
    /// # Errors
    /// - `StoreError::Duplicate` if the code already exists
    /// - `StoreError::Validation` for a bad code, name or price
    pub fn insert(&mut self, mut record: InventoryRecord) -> StoreResult<()> {
        record.code = validate_barcode(&record.code)?.to_string();
        validate_product_name(&record.name)?;
        validate_price(record.price)?;

        if self.index.contains_key(&record.code) {
            return Err(StoreError::Duplicate { code: record.code });
        }

        debug!(code = %record.code, "Inserted product");
        self.push(record);
        Ok(())
    }

    /// Replaces name, price and stock of an existing record.
    ///
    /// Extra columns of the row are left as they are.
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the code is unknown
    /// - `StoreError::Validation` for a bad name or price
    pub fn update(&mut self, record: InventoryRecord) -> StoreResult<()> {
        let code = validate_barcode(&record.code)?;
        validate_product_name(&record.name)?;
        validate_price(record.price)?;

        let i = self
            .index
            .get(code)
            .copied()
            .ok_or_else(|| StoreError::NotFound {
                code: code.to_string(),
            })?;

        let row = &mut self.table.rows[i].record;
        row.name = record.name.trim().to_string();
        row.price = record.price;
        row.stock = record.stock;
        self.dirty = true;

        debug!(code = %row.code, "Updated product");
        Ok(())
    }

    fn push(&mut self, record: InventoryRecord) {
        self.index.insert(record.code.clone(), self.table.rows.len());
        self.table.rows.push(StoredRow::new(record));
        self.dirty = true;
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Record for `code`, if any. Surrounding whitespace is ignored.
    pub fn get(&self, code: &str) -> Option<&InventoryRecord> {
        self.index
            .get(code.trim())
            .map(|&i| &self.table.rows[i].record)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.index.contains_key(code.trim())
    }

    /// Records in insertion order (file order, then newly added).
    pub fn records(&self) -> impl Iterator<Item = &InventoryRecord> {
        self.table.records()
    }

    /// Owned copy of every record, in insertion order.
    pub fn snapshot(&self) -> Vec<InventoryRecord> {
        self.records().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Path of the durable file.
    pub fn path(&self) -> &Path {
        &self.config.path
    }

    /// Values given to first-seen codes.
    pub fn defaults(&self) -> &RecordDefaults {
        &self.config.defaults
    }

    /// Full table, including uninterpreted columns.
    pub fn table(&self) -> &InventoryTable {
        &self.table
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use stockscan_core::{Money, StockChange};
    use tempfile::tempdir;

    fn open_at(path: &Path) -> InventoryStore {
        InventoryStore::open(StoreConfig::new(path)).unwrap()
    }

    #[test]
    fn test_first_scan_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");

        let mut store = open_at(&path);
        assert!(store.is_empty());
        assert!(!store.has_unsaved_changes());

        let outcome = store.upsert("123").unwrap();
        assert!(outcome.was_new);
        assert_eq!(outcome.record.name, "Product_123");
        assert_eq!(outcome.record.price, Money::from_cents(999));
        assert_eq!(outcome.record.stock, 1);
        assert!(store.has_unsaved_changes());

        store.persist().unwrap();
        assert!(!store.has_unsaved_changes());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Barcode,Product Name,Price,Stock\n123,Product_123,9.99,1\n"
        );
    }

    #[test]
    fn test_restock_existing_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "Barcode,Product Name,Price,Stock\n123,Cola,1.50,3\n").unwrap();

        let mut store = open_at(&path);
        let outcome = store.upsert("123").unwrap();

        assert_eq!(outcome.kind(), StockChange::Restocked);
        assert_eq!(outcome.record.stock, 4);
        assert_eq!(outcome.record.name, "Cola");
        assert_eq!(outcome.record.price, Money::from_cents(150));
        assert_eq!(store.len(), 1);

        store.persist().unwrap();
        let reopened = open_at(&path);
        assert_eq!(reopened.get("123").unwrap().stock, 4);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "Barcode,Product Name,Price,Stock\n900,Tea,2.00,1\n100,Milk,1.00,1\n").unwrap();

        let mut store = open_at(&path);
        store.upsert("500").unwrap();
        store.upsert("100").unwrap();
        store.persist().unwrap();

        let codes: Vec<_> = open_at(&path).records().map(|r| r.code.clone()).collect();
        assert_eq!(codes, vec!["900", "100", "500"]);
    }

    #[test]
    fn test_upsert_trims_and_rejects_empty() {
        let dir = tempdir().unwrap();
        let mut store = open_at(&dir.path().join("inventory.csv"));

        store.upsert(" 123 ").unwrap();
        assert!(store.contains("123"));
        assert!(!store.upsert("123").unwrap().was_new);

        let err = store.upsert("   ").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_persist_failure_keeps_changes_for_retry() {
        let dir = tempdir().unwrap();
        let sub = dir.path().join("usb");
        let path = sub.join("inventory.csv");

        let mut store = open_at(&path);
        store.upsert("123").unwrap();

        let err = store.persist().unwrap_err();
        assert!(err.is_persist());
        assert!(store.has_unsaved_changes());
        assert_eq!(store.get("123").unwrap().stock, 1);

        store.upsert("123").unwrap();
        fs::create_dir(&sub).unwrap();
        store.persist().unwrap();

        assert!(!store.has_unsaved_changes());
        assert_eq!(open_at(&path).get("123").unwrap().stock, 2);
    }

    #[test]
    fn test_open_corrupt_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "Barcode,Product Name,Price,Stock\n123,Cola,abc,1\n").unwrap();

        let err = InventoryStore::open(StoreConfig::new(&path)).unwrap_err();
        assert!(err.is_corrupt());
        // Never repaired behind the operator's back
        assert!(fs::read_to_string(&path).unwrap().contains("abc"));
    }

    #[test]
    fn test_custom_defaults() {
        let dir = tempdir().unwrap();
        let config = StoreConfig::new(dir.path().join("inventory.csv"))
            .name_prefix("Item-")
            .default_price(Money::from_cents(0));

        let mut store = InventoryStore::open(config).unwrap();
        let outcome = store.upsert("9").unwrap();
        assert_eq!(outcome.record.name, "Item-9");
        assert!(outcome.record.price.is_zero());
    }

    #[test]
    fn test_insert_and_duplicate() {
        let dir = tempdir().unwrap();
        let mut store = open_at(&dir.path().join("inventory.csv"));

        let record = InventoryRecord::new("123", "Cola", Money::from_cents(150), 10);
        store.insert(record.clone()).unwrap();
        assert_eq!(store.get("123"), Some(&record));

        let err = store.insert(record).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { code } if code == "123"));

        let err = store
            .insert(InventoryRecord::new("456", "", Money::from_cents(1), 1))
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_update_keeps_extra_columns() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "Barcode,Category,Product Name,Price,Stock\n123,Drinks,Product_123,9.99,4\n").unwrap();

        let mut store = open_at(&path);
        store
            .update(InventoryRecord::new("123", "Cola 330ml", Money::from_cents(120), 4))
            .unwrap();
        store.persist().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Barcode,Category,Product Name,Price,Stock\n123,Drinks,Cola 330ml,1.20,4\n"
        );
    }

    #[test]
    fn test_update_unknown_code() {
        let dir = tempdir().unwrap();
        let mut store = open_at(&dir.path().join("inventory.csv"));

        let err = store
            .update(InventoryRecord::new("404", "Ghost", Money::from_cents(1), 1))
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert!(!store.has_unsaved_changes());
    }

    #[test]
    fn test_missing_name_column_added_on_persist() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("inventory.csv");
        fs::write(&path, "Code,Price,Stock\n123,1.00,2\n").unwrap();

        let mut store = open_at(&path);
        store.upsert("123").unwrap();
        store.persist().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "Code,Price,Stock,Product Name\n123,1.00,3,Product_123\n"
        );
    }

    #[test]
    fn test_snapshot_is_detached() {
        let dir = tempdir().unwrap();
        let mut store = open_at(&dir.path().join("inventory.csv"));
        store.upsert("1").unwrap();

        let snapshot = store.snapshot();
        store.upsert("1").unwrap();

        assert_eq!(snapshot[0].stock, 1);
        assert_eq!(store.get("1").unwrap().stock, 2);
    }
}

//! # Manual Entry
//!
//! `add` and `edit` change the inventory without a camera: naming the
//! placeholder products a scan session created, fixing prices, or
//! correcting a count after a stocktake.

use anyhow::{bail, Result};
use stockscan_core::{InventoryRecord, Money};
use stockscan_scanner::ScannerConfig;
use stockscan_store::{InventoryStore, StoreError};
use tracing::info;

use super::open_store;

/// Adds a product. Unset fields take the configured defaults and stock 1.
pub fn add(
    config: &ScannerConfig,
    code: &str,
    name: Option<String>,
    price: Option<Money>,
    stock: Option<u64>,
) -> Result<()> {
    let mut store = open_store(config)?;
    let record = add_to(&mut store, code, name, price, stock)?;
    store.persist()?;

    info!(code = %record.code, "Product added");
    println!("Added {} ({}, {}, stock {})", record.code, record.name, record.price, record.stock);
    Ok(())
}

/// Changes the given fields of an existing product.
pub fn edit(
    config: &ScannerConfig,
    code: &str,
    name: Option<String>,
    price: Option<Money>,
    stock: Option<u64>,
) -> Result<()> {
    let mut store = open_store(config)?;
    let record = edit_in(&mut store, code, name, price, stock)?;
    store.persist()?;

    info!(code = %record.code, "Product updated");
    println!("Updated {} ({}, {}, stock {})", record.code, record.name, record.price, record.stock);
    Ok(())
}

fn add_to(
    store: &mut InventoryStore,
    code: &str,
    name: Option<String>,
    price: Option<Money>,
    stock: Option<u64>,
) -> Result<InventoryRecord> {
    let code = code.trim();
    let defaults = store.defaults();
    let record = InventoryRecord::new(
        code,
        name.unwrap_or_else(|| defaults.placeholder_name(code)),
        price.unwrap_or(defaults.price),
        stock.unwrap_or(1),
    );

    store.insert(record.clone())?;
    Ok(record)
}

fn edit_in(
    store: &mut InventoryStore,
    code: &str,
    name: Option<String>,
    price: Option<Money>,
    stock: Option<u64>,
) -> Result<InventoryRecord> {
    if name.is_none() && price.is_none() && stock.is_none() {
        bail!("Nothing to change: pass --name, --price or --stock");
    }

    let mut record = store
        .get(code)
        .cloned()
        .ok_or_else(|| StoreError::NotFound {
            code: code.trim().to_string(),
        })?;

    if let Some(name) = name {
        record.name = name;
    }
    if let Some(price) = price {
        record.price = price;
    }
    if let Some(stock) = stock {
        record.stock = stock;
    }

    let code = record.code.clone();
    store.update(record)?;
    store
        .get(&code)
        .cloned()
        .ok_or_else(|| StoreError::NotFound { code }.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockscan_store::StoreConfig;

    fn empty_store(dir: &tempfile::TempDir) -> InventoryStore {
        InventoryStore::open(StoreConfig::new(dir.path().join("inventory.csv"))).unwrap()
    }

    #[test]
    fn test_add_uses_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);

        let record = add_to(&mut store, " 123 ", None, None, None).unwrap();
        assert_eq!(record.code, "123");
        assert_eq!(record.name, "Product_123");
        assert_eq!(record.price, Money::from_cents(999));
        assert_eq!(record.stock, 1);
    }

    #[test]
    fn test_add_duplicate_fails() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);

        add_to(&mut store, "123", Some("Cola".into()), None, Some(5)).unwrap();
        let err = add_to(&mut store, "123", None, None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::Duplicate { .. })
        ));
    }

    #[test]
    fn test_edit_changes_only_given_fields() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store.upsert("123").unwrap();

        let record = edit_in(&mut store, "123", Some("Cola".into()), None, None).unwrap();
        assert_eq!(record.name, "Cola");
        assert_eq!(record.price, Money::from_cents(999));
        assert_eq!(record.stock, 1);

        let record = edit_in(&mut store, "123", None, Some(Money::from_cents(120)), Some(24)).unwrap();
        assert_eq!(store.get("123"), Some(&record));
        assert_eq!(record.name, "Cola");
    }

    #[test]
    fn test_edit_reports_name_as_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);
        store.upsert("123").unwrap();

        let record = edit_in(&mut store, "123", Some("  Cola  ".into()), None, None).unwrap();
        assert_eq!(record.name, "Cola");
        assert_eq!(store.get("123"), Some(&record));
    }

    #[test]
    fn test_edit_unknown_or_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = empty_store(&dir);

        let err = edit_in(&mut store, "404", Some("Ghost".into()), None, None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotFound { .. })
        ));

        store.upsert("1").unwrap();
        assert!(edit_in(&mut store, "1", None, None, None).is_err());
    }
}

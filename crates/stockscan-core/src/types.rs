//! # Domain Types
//!
//! Core inventory types used throughout stockscan.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ InventoryRecord │   │ RecordDefaults  │   │  UpsertOutcome  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  code (key)     │   │  name_prefix    │   │  record         │       │
//! │  │  name           │   │  price          │   │  was_new        │       │
//! │  │  price (Money)  │   └─────────────────┘   └─────────────────┘       │
//! │  │  stock (u64)    │                                                   │
//! │  └─────────────────┘   ┌─────────────────┐                             │
//! │                        │  StockChange    │                             │
//! │                        │  Added          │                             │
//! │                        │  Restocked      │                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! The barcode payload is the only identity a record has. There is no
//! surrogate id: the inventory file is keyed by what the scanner reads.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::{DEFAULT_NAME_PREFIX, DEFAULT_PRICE_CENTS};

// =============================================================================
// Inventory Record
// =============================================================================

/// One row of the inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Barcode payload - unique key across the store.
    pub code: String,

    /// Display name. A placeholder until someone edits it.
    pub name: String,

    /// Unit price.
    pub price: Money,

    /// Units on hand.
    pub stock: u64,
}

impl InventoryRecord {
    /// Creates a record from its parts.
    pub fn new(code: impl Into<String>, name: impl Into<String>, price: Money, stock: u64) -> Self {
        InventoryRecord {
            code: code.into(),
            name: name.into(),
            price,
            stock,
        }
    }

    /// Adds exactly one unit to the stock and returns the new level.
    ///
    /// ## User Workflow
    /// ```text
    /// Barcode held in front of camera
    ///      │
    ///      ▼
    /// Already in inventory? ── yes ──► restock_one() ← THIS FUNCTION
    ///      │                                │
    ///      no                               ▼
    ///      │                          stock: 3 → 4
    ///      ▼
    /// RecordDefaults::new_record() (stock = 1)
    /// ```
    pub fn restock_one(&mut self) -> CoreResult<u64> {
        self.stock = self
            .stock
            .checked_add(1)
            .ok_or_else(|| CoreError::StockOverflow {
                code: self.code.clone(),
                stock: self.stock,
            })?;
        Ok(self.stock)
    }

    /// Value of the units on hand (price × stock).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(self.stock)
    }
}

// =============================================================================
// Record Defaults
// =============================================================================

/// Values given to a code the first time it is scanned.
///
/// Stores override both in the `[defaults]` config section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordDefaults {
    /// Prefix of the placeholder name (`"Product_"` → `"Product_123"`).
    pub name_prefix: String,

    /// Starting price.
    pub price: Money,
}

impl Default for RecordDefaults {
    fn default() -> Self {
        RecordDefaults {
            name_prefix: DEFAULT_NAME_PREFIX.to_string(),
            price: Money::from_cents(DEFAULT_PRICE_CENTS),
        }
    }
}

impl RecordDefaults {
    /// Creates defaults from a prefix and price.
    pub fn new(name_prefix: impl Into<String>, price: Money) -> Self {
        RecordDefaults {
            name_prefix: name_prefix.into(),
            price,
        }
    }

    /// Placeholder name for a code: prefix followed by the code.
    pub fn placeholder_name(&self, code: &str) -> String {
        format!("{}{}", self.name_prefix, code)
    }

    /// A freshly-seen record: placeholder name, default price, one unit.
    pub fn new_record(&self, code: &str) -> InventoryRecord {
        InventoryRecord::new(code, self.placeholder_name(code), self.price, 1)
    }
}

// =============================================================================
// Upsert Outcome
// =============================================================================

/// Which way an upsert went.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockChange {
    /// Code was unknown; a record was created with stock 1.
    Added,
    /// Code was known; its stock grew by one.
    Restocked,
}

impl fmt::Display for StockChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StockChange::Added => write!(f, "added"),
            StockChange::Restocked => write!(f, "restocked"),
        }
    }
}

/// Result of an upsert: the record after the change, and whether it is new.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertOutcome {
    /// Record as it now stands in the store.
    pub record: InventoryRecord,

    /// True if the upsert created the record.
    pub was_new: bool,
}

impl UpsertOutcome {
    /// Outcome for a newly created record.
    pub fn added(record: InventoryRecord) -> Self {
        UpsertOutcome {
            record,
            was_new: true,
        }
    }

    /// Outcome for a restocked record.
    pub fn restocked(record: InventoryRecord) -> Self {
        UpsertOutcome {
            record,
            was_new: false,
        }
    }

    /// Added vs. restocked.
    pub fn kind(&self) -> StockChange {
        if self.was_new {
            StockChange::Added
        } else {
            StockChange::Restocked
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uses_defaults() {
        let defaults = RecordDefaults::default();
        let record = defaults.new_record("123");

        assert_eq!(record.code, "123");
        assert_eq!(record.name, "Product_123");
        assert_eq!(record.price, Money::from_cents(999));
        assert_eq!(record.stock, 1);
    }

    #[test]
    fn test_custom_defaults() {
        let defaults = RecordDefaults::new("Item-", Money::from_cents(0));
        let record = defaults.new_record("ABC");

        assert_eq!(record.name, "Item-ABC");
        assert!(record.price.is_zero());
    }

    #[test]
    fn test_restock_one() {
        let mut record = InventoryRecord::new("123", "Cola", Money::from_cents(150), 3);
        assert_eq!(record.restock_one().unwrap(), 4);
        assert_eq!(record.stock, 4);
    }

    #[test]
    fn test_restock_overflow_leaves_stock_untouched() {
        let mut record = InventoryRecord::new("123", "Cola", Money::from_cents(150), u64::MAX);
        let err = record.restock_one().unwrap_err();

        assert!(matches!(err, CoreError::StockOverflow { .. }));
        assert_eq!(record.stock, u64::MAX);
    }

    #[test]
    fn test_stock_value() {
        let record = InventoryRecord::new("123", "Cola", Money::from_cents(150), 4);
        assert_eq!(record.stock_value().cents(), 600);
    }

    #[test]
    fn test_upsert_outcome_kind() {
        let record = RecordDefaults::default().new_record("1");
        assert_eq!(UpsertOutcome::added(record.clone()).kind(), StockChange::Added);
        assert_eq!(UpsertOutcome::restocked(record).kind(), StockChange::Restocked);
        assert_eq!(StockChange::Restocked.to_string(), "restocked");
    }

    #[test]
    fn test_record_json_shape() {
        let record = InventoryRecord::new("123", "Cola", Money::from_cents(150), 2);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["code"], "123");
        assert_eq!(json["price"], "1.50");
        assert_eq!(json["stock"], 2);
    }
}

//! # stockscan-store: Durable Inventory File
//!
//! Owns the inventory spreadsheet: loading it, applying scan updates and
//! manual edits, and saving it without ever leaving a half-written file.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockscan-store                                  │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      InventoryStore                              │  │
//! │  │   open() • upsert() • insert() • update() • persist() • get()    │  │
//! │  └───────────────────────────┬──────────────────────────────────────┘  │
//! │                              │                                          │
//! │  ┌───────────────────────────▼──────────────────────────────────────┐  │
//! │  │                 table (read_table / write_table)                 │  │
//! │  │        CSV parse with line numbers • temp file + rename          │  │
//! │  └───────────────────────────┬──────────────────────────────────────┘  │
//! │                              │                                          │
//! │  ┌───────────────────────────▼──────────────────────────────────────┐  │
//! │  │                    schema (Layout / Column)                      │  │
//! │  │        header aliases • extra columns • canonical header         │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## File Format
//! ```text
//! Barcode,Product Name,Price,Stock
//! 4006381333931,Product_4006381333931,9.99,1
//! 036000291452,Cola 330ml,1.20,24
//! ```

pub mod config;
pub mod error;
pub mod schema;
pub mod store;
pub mod table;

pub use config::{StoreConfig, DEFAULT_INVENTORY_FILE};
pub use error::{StoreError, StoreResult};
pub use schema::{Column, Layout, CANONICAL_HEADERS};
pub use store::InventoryStore;
pub use table::{read_table, write_table, InventoryTable, StoredRow};

//! # CLI Commands
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (shared helpers)
//! ├── capture.rs  ◄─── scan, replay (the capture loop)
//! ├── decode.rs   ◄─── decode (read-only)
//! ├── product.rs  ◄─── add, edit (manual entry)
//! ├── list.rs     ◄─── list
//! └── config.rs   ◄─── config
//! ```

pub mod capture;
pub mod config;
pub mod decode;
pub mod list;
pub mod product;

use anyhow::{Context, Result};
use stockscan_scanner::ScannerConfig;
use stockscan_store::InventoryStore;

/// Opens the configured inventory. A corrupt file stops the command here.
pub(crate) fn open_store(config: &ScannerConfig) -> Result<InventoryStore> {
    InventoryStore::open(config.store_config())
        .with_context(|| format!("Cannot open inventory {}", config.inventory.path.display()))
}

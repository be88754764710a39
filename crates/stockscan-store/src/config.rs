//! # Store Configuration
//!
//! Where the inventory lives and what a first-seen code looks like.

use std::path::PathBuf;

use stockscan_core::{Money, RecordDefaults};

/// Default inventory file name, relative to the working directory.
pub const DEFAULT_INVENTORY_FILE: &str = "inventory.csv";

/// Inventory store configuration.
///
/// ## Example
/// ```rust
/// use stockscan_core::Money;
/// use stockscan_store::StoreConfig;
///
/// let config = StoreConfig::new("/srv/shop/inventory.csv")
///     .name_prefix("Item_")
///     .default_price(Money::from_cents(500));
/// assert_eq!(config.defaults.placeholder_name("42"), "Item_42");
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the inventory file. Created on first persist if absent.
    pub path: PathBuf,

    /// Values given to codes seen for the first time.
    pub defaults: RecordDefaults,
}

impl StoreConfig {
    /// Creates a configuration for the given file with default record values.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            defaults: RecordDefaults::default(),
        }
    }

    /// Replaces the record defaults.
    pub fn defaults(mut self, defaults: RecordDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    /// Sets the placeholder-name prefix.
    pub fn name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.defaults.name_prefix = prefix.into();
        self
    }

    /// Sets the starting price for new codes.
    pub fn default_price(mut self, price: Money) -> Self {
        self.defaults.price = price;
        self
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::new(DEFAULT_INVENTORY_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = StoreConfig::new("/tmp/inv.csv")
            .name_prefix("SKU-")
            .default_price(Money::from_cents(125));

        assert_eq!(config.path, PathBuf::from("/tmp/inv.csv"));
        assert_eq!(config.defaults.name_prefix, "SKU-");
        assert_eq!(config.defaults.price.cents(), 125);
    }

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from(DEFAULT_INVENTORY_FILE));
        assert_eq!(config.defaults, RecordDefaults::default());
    }
}

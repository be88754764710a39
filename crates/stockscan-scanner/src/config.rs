//! # Scanner Configuration
//!
//! Configuration for the inventory file, record defaults and capture.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command-line flags (highest priority, applied by the CLI)          │
//! │     --inventory ./shop.csv                                             │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     STOCKSCAN_INVENTORY=/srv/shop/inventory.csv                        │
//! │     STOCKSCAN_DEFAULT_PRICE=4.50                                       │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     ~/.config/stockscan/stockscan.toml (Linux)                         │
//! │     ~/Library/Application Support/dev.stockscan.stockscan/... (macOS)  │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! │     inventory.csv, Product_<code>, $9.99, camera 0                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # stockscan.toml
//! [inventory]
//! path = "/srv/shop/inventory.csv"
//!
//! [defaults]
//! price = "9.99"
//! name_prefix = "Product_"
//!
//! [capture]
//! camera_index = 0
//! frame_interval_ms = 0
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use stockscan_core::{Money, RecordDefaults, DEFAULT_NAME_PREFIX, DEFAULT_PRICE_CENTS};
use stockscan_store::{StoreConfig, DEFAULT_INVENTORY_FILE};
use tracing::{debug, info, warn};

use crate::error::{ScanError, ScanResult};

/// Config file name inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "stockscan.toml";

// =============================================================================
// Sections
// =============================================================================

/// `[inventory]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySettings {
    /// Inventory file path.
    #[serde(default = "default_inventory_path")]
    pub path: PathBuf,
}

fn default_inventory_path() -> PathBuf {
    PathBuf::from(DEFAULT_INVENTORY_FILE)
}

impl Default for InventorySettings {
    fn default() -> Self {
        InventorySettings {
            path: default_inventory_path(),
        }
    }
}

/// `[defaults]` section: what a first-seen code looks like.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultsSettings {
    /// Starting price. Accepts `"9.99"` or `9.99`.
    #[serde(default = "default_price")]
    pub price: Money,

    /// Placeholder-name prefix.
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

fn default_price() -> Money {
    Money::from_cents(DEFAULT_PRICE_CENTS)
}

fn default_name_prefix() -> String {
    DEFAULT_NAME_PREFIX.to_string()
}

impl Default for DefaultsSettings {
    fn default() -> Self {
        DefaultsSettings {
            price: default_price(),
            name_prefix: default_name_prefix(),
        }
    }
}

/// `[capture]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSettings {
    /// Webcam index for `stockscan scan`.
    #[serde(default)]
    pub camera_index: u32,

    /// Pause after each frame, in milliseconds. 0 = as fast as frames arrive.
    #[serde(default)]
    pub frame_interval_ms: u64,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        CaptureSettings {
            camera_index: 0,
            frame_interval_ms: 0,
        }
    }
}

// =============================================================================
// Scanner Config
// =============================================================================

/// Complete scanner configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerConfig {
    #[serde(default)]
    pub inventory: InventorySettings,

    #[serde(default)]
    pub defaults: DefaultsSettings,

    #[serde(default)]
    pub capture: CaptureSettings,
}

impl ScannerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (`config_path`, else the platform default)
    /// 3. Environment variables
    ///
    /// An explicitly given `config_path` must exist; the platform default
    /// may be absent.
    pub fn load(config_path: Option<PathBuf>) -> ScanResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading scanner config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml(&contents)?;
            } else if explicit {
                return Err(ScanError::ConfigLoad(format!(
                    "config file {} does not exist",
                    path.display()
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document. Missing sections and keys take defaults.
    pub fn from_toml(contents: &str) -> ScanResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> ScanResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ScanResult<()> {
        if self.inventory.path.as_os_str().is_empty() {
            return Err(ScanError::Config("inventory path must not be empty".into()));
        }

        if self.defaults.price.is_negative() {
            return Err(ScanError::Config(format!(
                "default price must not be negative, got {}",
                self.defaults.price
            )));
        }

        if self.defaults.name_prefix.trim().is_empty() {
            return Err(ScanError::Config("name_prefix must not be empty".into()));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `STOCKSCAN_*` overrides from a key lookup.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("STOCKSCAN_INVENTORY") {
            debug!(path = %path, "Overriding inventory path from environment");
            self.inventory.path = PathBuf::from(path);
        }

        if let Some(price) = lookup("STOCKSCAN_DEFAULT_PRICE") {
            match price.parse::<Money>() {
                Ok(p) => self.defaults.price = p,
                Err(e) => warn!(price = %price, error = %e, "Ignoring invalid STOCKSCAN_DEFAULT_PRICE"),
            }
        }

        if let Some(prefix) = lookup("STOCKSCAN_NAME_PREFIX") {
            self.defaults.name_prefix = prefix;
        }

        if let Some(index) = lookup("STOCKSCAN_CAMERA_INDEX") {
            match index.parse::<u32>() {
                Ok(i) => self.capture.camera_index = i,
                Err(_) => warn!(index = %index, "Ignoring invalid STOCKSCAN_CAMERA_INDEX"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "stockscan", "stockscan")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Defaults for first-seen codes.
    pub fn record_defaults(&self) -> RecordDefaults {
        RecordDefaults::new(self.defaults.name_prefix.clone(), self.defaults.price)
    }

    /// Store configuration for the configured inventory file.
    pub fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.inventory.path.clone()).defaults(self.record_defaults())
    }

    /// Pause between frames, if any.
    pub fn frame_interval(&self) -> Option<Duration> {
        match self.capture.frame_interval_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.inventory.path, PathBuf::from("inventory.csv"));
        assert_eq!(config.defaults.price, Money::from_cents(999));
        assert_eq!(config.defaults.name_prefix, "Product_");
        assert_eq!(config.capture.camera_index, 0);
        assert!(config.frame_interval().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_takes_defaults() {
        let config = ScannerConfig::from_toml(
            r#"
            [defaults]
            price = 4.5

            [capture]
            frame_interval_ms = 100
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults.price, Money::from_cents(450));
        assert_eq!(config.defaults.name_prefix, "Product_");
        assert_eq!(config.inventory.path, PathBuf::from("inventory.csv"));
        assert_eq!(config.frame_interval(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn test_price_as_string() {
        let config = ScannerConfig::from_toml("[defaults]\nprice = \"$12.00\"\n").unwrap();
        assert_eq!(config.defaults.price, Money::from_cents(1200));
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = ScannerConfig::default();
        config.inventory.path = PathBuf::from("/srv/shop/inventory.csv");
        config.defaults.name_prefix = "Item-".into();
        config.capture.camera_index = 2;

        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[inventory]"));
        assert!(toml.contains("price = \"9.99\""));

        let parsed = ScannerConfig::from_toml(&toml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_validation() {
        let mut config = ScannerConfig::default();
        assert!(config.validate().is_ok());

        config.defaults.price = Money::from_cents(-1);
        assert!(config.validate().is_err());

        config.defaults.price = Money::zero();
        config.defaults.name_prefix = "  ".into();
        assert!(config.validate().is_err());

        config.defaults.name_prefix = "P".into();
        config.inventory.path = PathBuf::new();
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_overrides() {
        let mut config = ScannerConfig::default();
        config.apply_overrides(lookup(&[
            ("STOCKSCAN_INVENTORY", "/tmp/shop.csv"),
            ("STOCKSCAN_DEFAULT_PRICE", "1.25"),
            ("STOCKSCAN_NAME_PREFIX", "SKU_"),
            ("STOCKSCAN_CAMERA_INDEX", "3"),
        ]));

        assert_eq!(config.inventory.path, PathBuf::from("/tmp/shop.csv"));
        assert_eq!(config.defaults.price, Money::from_cents(125));
        assert_eq!(config.defaults.name_prefix, "SKU_");
        assert_eq!(config.capture.camera_index, 3);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let mut config = ScannerConfig::default();
        config.apply_overrides(lookup(&[
            ("STOCKSCAN_DEFAULT_PRICE", "cheap"),
            ("STOCKSCAN_CAMERA_INDEX", "-1"),
        ]));

        assert_eq!(config, ScannerConfig::default());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stockscan.toml");
        std::fs::write(&path, "[defaults]\nname_prefix = \"Shelf_\"\n").unwrap();

        let config = ScannerConfig::load(Some(path)).unwrap();
        assert_eq!(config.store_config().defaults.placeholder_name("7"), "Shelf_7");
    }

    #[test]
    fn test_load_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = ScannerConfig::load(Some(dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.is_config_error());
    }
}

//! # stockscan-core: Pure Inventory Logic
//!
//! This crate is the domain heart of stockscan. It holds the inventory
//! record model, money handling, scan-session deduplication and input
//! validation as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockscan Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    stockscan CLI (apps/cli)                     │   │
//! │  │         scan ──► replay ──► add/edit ──► list                   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          stockscan-scanner (capture loop, decoding)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             stockscan-store (durable inventory file)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockscan-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  session  │  │ validation│  │   │
//! │  │   │  Record   │  │   Money   │  │ScanSession│  │   rules   │  │   │
//! │  │   │  Defaults │  │  parsing  │  │   dedup   │  │   GTIN    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO FILES • NO CAMERA • PURE FUNCTIONS               │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - `InventoryRecord`, `RecordDefaults`, `UpsertOutcome`
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`session`] - Per-run deduplication of scanned codes
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation and GTIN check digits
//!
//! ## Example Usage
//!
//! ```rust
//! use stockscan_core::{RecordDefaults, ScanSession};
//!
//! let defaults = RecordDefaults::default();
//! let record = defaults.new_record("123");
//! assert_eq!(record.name, "Product_123");
//! assert_eq!(record.stock, 1);
//!
//! let mut session = ScanSession::new();
//! assert!(session.mark_if_new("123"));
//! assert!(!session.mark_if_new("123"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::ScanSession;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Prefix of the placeholder name given to a code seen for the first time.
pub const DEFAULT_NAME_PREFIX: &str = "Product_";

/// Price given to a code seen for the first time, in cents ($9.99).
pub const DEFAULT_PRICE_CENTS: i64 = 999;

/// Longest barcode payload accepted as an inventory key.
///
/// ## Business Reason
/// Linear symbologies top out well below this; QR payloads can be longer,
/// but anything past this is not a product code.
pub const MAX_BARCODE_LENGTH: usize = 128;

/// Longest product name accepted from manual entry.
pub const MAX_NAME_LENGTH: usize = 200;

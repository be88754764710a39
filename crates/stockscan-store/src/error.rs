//! # Store Error Types
//!
//! Error types for inventory file operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  Startup                         Capture loop                          │
//! │  ───────                         ────────────                          │
//! │  open() ──► Corrupt ──► fatal    upsert() ──► persist() ──► Persist    │
//! │        └─► Unreadable ─► fatal                     │                    │
//! │                                                    ▼                    │
//! │                                  in-memory change KEPT, reported,       │
//! │                                  flushed by the next good persist       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::path::{Path, PathBuf};

use stockscan_core::{CoreError, ValidationError};
use thiserror::Error;

/// Inventory store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The inventory file exists but does not parse into the expected schema.
    ///
    /// ## When This Occurs
    /// - A required column (barcode, price, stock) is missing
    /// - A price or stock cell is malformed or negative
    /// - Two rows share a barcode
    /// - The file has no header row (e.g. truncated to zero bytes)
    ///
    /// Never auto-repaired: the operator has to look at the file.
    #[error("Inventory file {} is corrupt: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The inventory file exists but could not be opened or read.
    #[error("Cannot read inventory file {}: {source}", path.display())]
    Unreadable { path: PathBuf, source: io::Error },

    /// Writing the updated table failed.
    ///
    /// ## When This Occurs
    /// - Disk full
    /// - Permission denied on the directory
    /// - Directory removed (USB stick pulled)
    #[error("Failed to save inventory to {}: {source}", path.display())]
    Persist { path: PathBuf, source: io::Error },

    /// No record with this code.
    #[error("No product with barcode {code}")]
    NotFound { code: String },

    /// A record with this code already exists.
    #[error("Barcode {code} already exists")]
    Duplicate { code: String },

    /// Input failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Domain rule violation.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl StoreError {
    /// Creates a Corrupt error for a given file.
    pub fn corrupt(path: &Path, reason: impl Into<String>) -> Self {
        StoreError::Corrupt {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Creates a Persist error for a given file.
    pub fn persist(path: &Path, source: io::Error) -> Self {
        StoreError::Persist {
            path: path.to_path_buf(),
            source,
        }
    }

    /// True for `Corrupt`.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }

    /// True for `Persist`.
    pub fn is_persist(&self) -> bool {
        matches!(self, StoreError::Persist { .. })
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::corrupt(Path::new("inv.csv"), "line 3: price 'abc' is not a number");
        assert_eq!(
            err.to_string(),
            "Inventory file inv.csv is corrupt: line 3: price 'abc' is not a number"
        );
        assert!(err.is_corrupt());
        assert!(!err.is_persist());
    }

    #[test]
    fn test_persist_error_keeps_io_source() {
        let err = StoreError::persist(
            Path::new("inv.csv"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_persist());
        assert!(std::error::Error::source(&err).is_some());
    }
}

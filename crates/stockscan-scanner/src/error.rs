//! # Scanner Error Types
//!
//! Error types for capture, decoding and configuration.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Scanner Error Types                               │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Capture        │  │  Configuration  │  │  Stop handler           │ │
//! │  │  ───────        │  │  ─────────────  │  │  ────────────           │ │
//! │  │  Unavailable    │  │  Config         │  │  Signal                 │ │
//! │  │  ReadFailed     │  │  ConfigLoad     │  │                         │ │
//! │  │  SourceMissing  │  │  ConfigSave     │  │                         │ │
//! │  │  NotCompiled    │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  Store failures inside the capture loop become ScanEvents, not errors. │
//! │                                                                         │
//! │  Decoding never errors: a frame with nothing readable is an empty      │
//! │  result, not a failure.                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Capture device failures. Fatal to a capture run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaptureError {
    /// The device could not be opened.
    #[error("Cannot open {device}: {reason}")]
    Unavailable { device: String, reason: String },

    /// A frame read failed on an open device.
    #[error("Frame read from {device} failed: {reason}")]
    ReadFailed { device: String, reason: String },

    /// The replay directory does not exist or cannot be listed.
    #[error("Image source {path} is not readable: {reason}")]
    SourceMissing { path: String, reason: String },

    /// Live capture was requested but the binary was built without it.
    #[error("Camera support is not compiled in (rebuild with `--features camera`)")]
    NotCompiled,
}

/// Scanner errors.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Capture device error: {0}")]
    CaptureDevice(#[from] CaptureError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to load configuration: {0}")]
    ConfigLoad(String),

    #[error("Failed to save configuration: {0}")]
    ConfigSave(String),

    #[error("Failed to install stop handler: {0}")]
    Signal(String),
}

impl From<std::io::Error> for ScanError {
    fn from(err: std::io::Error) -> Self {
        ScanError::ConfigLoad(err.to_string())
    }
}

impl From<toml::de::Error> for ScanError {
    fn from(err: toml::de::Error) -> Self {
        ScanError::ConfigLoad(err.to_string())
    }
}

impl From<toml::ser::Error> for ScanError {
    fn from(err: toml::ser::Error) -> Self {
        ScanError::ConfigSave(err.to_string())
    }
}

impl From<ctrlc::Error> for ScanError {
    fn from(err: ctrlc::Error) -> Self {
        ScanError::Signal(err.to_string())
    }
}

impl ScanError {
    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScanError::Config(_) | ScanError::ConfigLoad(_) | ScanError::ConfigSave(_)
        )
    }
}

/// Result type for scanner operations.
pub type ScanResult<T> = Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CaptureError::ReadFailed {
            device: "camera 0".into(),
            reason: "device unplugged".into(),
        };
        assert_eq!(err.to_string(), "Frame read from camera 0 failed: device unplugged");

        let err: ScanError = err.into();
        assert!(err.to_string().starts_with("Capture device error"));
    }

    #[test]
    fn test_config_errors() {
        assert!(ScanError::Config("bad".into()).is_config_error());
        assert!(ScanError::ConfigLoad("bad".into()).is_config_error());
        assert!(!ScanError::from(CaptureError::NotCompiled).is_config_error());
    }
}

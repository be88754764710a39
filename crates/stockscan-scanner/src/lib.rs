//! # stockscan-scanner: Capture Loop for stockscan
//!
//! Reads frames from a camera (or a directory of photos), decodes the
//! barcodes in them, and counts every newly seen code into the inventory.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Capture Architecture                              │
//! │                                                                         │
//! │  ┌─────────────┐    ┌──────────────┐    ┌─────────────────────────┐    │
//! │  │ FrameSource │───►│ FrameDecoder │───►│ CaptureLoop             │    │
//! │  │             │    │              │    │                         │    │
//! │  │ Camera      │    │ RxingDecoder │    │ ScanSession (dedup)     │    │
//! │  │ Image replay│    │              │    │ InventoryStore (upsert, │    │
//! │  └─────────────┘    └──────────────┘    │   persist per code)     │    │
//! │         ▲                               └────────────┬────────────┘    │
//! │         │ release()                                  │                  │
//! │         └────────────────────────────────────────────┤                  │
//! │                                                      ▼                  │
//! │  ┌─────────────┐                        ┌─────────────────────────┐    │
//! │  │ StopSignal  │─── checked per frame ─►│ ScanObserver (events)   │    │
//! │  │ Ctrl+C / q  │                        │ CaptureReport (summary) │    │
//! │  └─────────────┘                        └─────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//! - [`capture`] - The loop, its events and report
//! - [`source`] - `FrameSource` and image replay
//! - [`decode`] - `FrameDecoder` and the rxing-backed decoder
//! - [`stop`] - Operator stop signal
//! - [`config`] - TOML + environment configuration
//! - [`error`] - Error types

pub mod capture;
pub mod config;
pub mod decode;
pub mod error;
pub mod frame;
pub mod source;
pub mod stop;

#[cfg(feature = "camera")]
pub mod camera;

pub use capture::{
    CaptureLoop, CaptureReport, LoopState, ScanEvent, ScanEventKind, ScanObserver, StopReason,
};
pub use config::{CaptureSettings, DefaultsSettings, InventorySettings, ScannerConfig};
pub use decode::{distinct_codes, DecodedCode, FrameDecoder, RxingDecoder};
pub use error::{CaptureError, ScanError, ScanResult};
pub use frame::Frame;
pub use source::{FrameSource, ImageSequenceSource};
pub use stop::StopSignal;

#[cfg(feature = "camera")]
pub use camera::CameraSource;

/// Opens the live camera at `index`.
///
/// Fails with `CaptureError::NotCompiled` when built without the
/// `camera` feature.
pub fn open_camera(index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
    #[cfg(feature = "camera")]
    {
        Ok(Box::new(CameraSource::open(index)?))
    }

    #[cfg(not(feature = "camera"))]
    {
        let _ = index;
        Err(CaptureError::NotCompiled)
    }
}

//! # Decode Stage
//!
//! Extracts barcode payloads from a frame.
//!
//! ```text
//! Frame (luma) ──► rxing multi-detector ──► [DecodedCode { text, format }, ...]
//!                        │
//!                        └── nothing found / detector error ──► []
//! ```
//!
//! Decoders are stateless: the same frame always yields the same list.

use serde::Serialize;
use std::collections::HashSet;
use tracing::trace;

use crate::frame::Frame;

/// One barcode found in a frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCode {
    /// Payload text, trimmed.
    pub text: String,

    /// Symbology name as reported by the detector (e.g. `EAN_13`, `QR_CODE`).
    pub format: String,
}

impl DecodedCode {
    pub fn new(text: impl Into<String>, format: impl Into<String>) -> Self {
        DecodedCode {
            text: text.into(),
            format: format.into(),
        }
    }
}

/// Turns a frame into the barcodes visible in it.
pub trait FrameDecoder {
    /// Every barcode found, in detector order. Never fails: an unreadable
    /// frame is an empty list.
    fn decode(&self, frame: &Frame) -> Vec<DecodedCode>;
}

impl<D: FrameDecoder + ?Sized> FrameDecoder for Box<D> {
    fn decode(&self, frame: &Frame) -> Vec<DecodedCode> {
        (**self).decode(frame)
    }
}

/// Decoder backed by rxing's multi-barcode detector.
///
/// Handles the common 1D retail symbologies (EAN-13, EAN-8, UPC-A, UPC-E,
/// Code 128, Code 39) as well as QR, Data Matrix and PDF417.
#[derive(Debug, Clone, Copy, Default)]
pub struct RxingDecoder;

impl RxingDecoder {
    pub fn new() -> Self {
        RxingDecoder
    }
}

impl FrameDecoder for RxingDecoder {
    fn decode(&self, frame: &Frame) -> Vec<DecodedCode> {
        let (width, height) = (frame.width(), frame.height());
        if width == 0 || height == 0 {
            return Vec::new();
        }

        let results =
            match rxing::helpers::detect_multiple_in_luma(frame.image.as_raw().clone(), width, height) {
                Ok(results) => results,
                Err(e) => {
                    trace!(sequence = frame.sequence, error = %e, "No barcode in frame");
                    return Vec::new();
                }
            };

        results
            .iter()
            .filter_map(|result| {
                let text = result.getText().trim();
                if text.is_empty() {
                    return None;
                }
                Some(DecodedCode::new(
                    text,
                    format!("{:?}", result.getBarcodeFormat()),
                ))
            })
            .collect()
    }
}

/// Payloads in first-seen order with repeats removed.
///
/// The same symbol can be reported twice in one frame (e.g. both halves of
/// a mirrored read); it still counts as one sighting.
pub fn distinct_codes(codes: &[DecodedCode]) -> Vec<String> {
    let mut seen = HashSet::new();
    codes
        .iter()
        .filter(|code| seen.insert(code.text.as_str()))
        .map(|code| code.text.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    #[test]
    fn test_blank_frame_decodes_to_nothing() {
        let frame = Frame::new(GrayImage::from_pixel(64, 64, Luma([255])), 1);
        assert!(RxingDecoder::new().decode(&frame).is_empty());
    }

    #[test]
    fn test_empty_frame_decodes_to_nothing() {
        let frame = Frame::new(GrayImage::new(0, 0), 1);
        assert!(RxingDecoder::new().decode(&frame).is_empty());
    }

    #[test]
    fn test_distinct_codes_keeps_first_seen_order() {
        let codes = vec![
            DecodedCode::new("456", "EAN_13"),
            DecodedCode::new("123", "QR_CODE"),
            DecodedCode::new("456", "EAN_13"),
        ];
        assert_eq!(distinct_codes(&codes), vec!["456", "123"]);
        assert!(distinct_codes(&[]).is_empty());
    }
}

//! Live webcam capture (feature `camera`).

use image::{DynamicImage, RgbImage};
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{CameraIndex, RequestedFormat, RequestedFormatType};
use nokhwa::Camera;
use tracing::{debug, info, warn};

use crate::error::CaptureError;
use crate::frame::Frame;
use crate::source::FrameSource;

/// Frames from a webcam, opened by index.
pub struct CameraSource {
    index: u32,
    camera: Option<Camera>,
    sequence: u64,
}

impl CameraSource {
    /// Opens camera `index` and starts streaming at its highest frame rate.
    pub fn open(index: u32) -> Result<Self, CaptureError> {
        let device = describe_index(index);
        let unavailable = |e: nokhwa::NokhwaError| CaptureError::Unavailable {
            device: device.clone(),
            reason: e.to_string(),
        };

        let format = RequestedFormat::new::<RgbFormat>(RequestedFormatType::AbsoluteHighestFrameRate);
        let mut camera = Camera::new(CameraIndex::Index(index), format).map_err(unavailable)?;
        camera.open_stream().map_err(unavailable)?;

        info!(camera = index, format = ?camera.camera_format(), "Camera opened");

        Ok(CameraSource {
            index,
            camera: Some(camera),
            sequence: 0,
        })
    }
}

impl FrameSource for CameraSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        let Some(camera) = self.camera.as_mut() else {
            return Ok(None);
        };

        let read_failed = |reason: String| CaptureError::ReadFailed {
            device: describe_index(self.index),
            reason,
        };

        let buffer = camera.frame().map_err(|e| read_failed(e.to_string()))?;
        let decoded = buffer
            .decode_image::<RgbFormat>()
            .map_err(|e| read_failed(e.to_string()))?;

        // nokhwa hands back its own `image` version; move the raw bytes across.
        let (width, height) = (decoded.width(), decoded.height());
        let rgb = RgbImage::from_raw(width, height, decoded.into_raw())
            .ok_or_else(|| read_failed("frame buffer size mismatch".to_string()))?;

        self.sequence += 1;
        debug!(sequence = self.sequence, width, height, "Frame captured");
        Ok(Some(Frame::from_dynamic(DynamicImage::ImageRgb8(rgb), self.sequence)))
    }

    fn release(&mut self) {
        if let Some(mut camera) = self.camera.take() {
            if let Err(e) = camera.stop_stream() {
                warn!(camera = self.index, error = %e, "Camera did not stop cleanly");
            } else {
                info!(camera = self.index, "Camera released");
            }
        }
    }

    fn describe(&self) -> String {
        describe_index(self.index)
    }
}

impl Drop for CameraSource {
    fn drop(&mut self) {
        self.release();
    }
}

fn describe_index(index: u32) -> String {
    format!("camera {index}")
}

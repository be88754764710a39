//! # Frame Sources
//!
//! Where frames come from.
//!
//! ## Implementations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         FrameSource                                     │
//! │                                                                         │
//! │  ┌──────────────────────────┐       ┌──────────────────────────┐       │
//! │  │  ImageSequenceSource     │       │  CameraSource            │       │
//! │  │  ──────────────────      │       │  ────────────            │       │
//! │  │  still images, in order  │       │  webcam via nokhwa       │       │
//! │  │  end of list → Ok(None)  │       │  (feature `camera`)      │       │
//! │  │  bad file → skipped      │       │  read failure → Err      │       │
//! │  └──────────────────────────┘       └──────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::CaptureError;
use crate::frame::Frame;

/// Image file extensions picked up from a replay directory.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// A stream of frames from a capture device.
pub trait FrameSource {
    /// Acquires the next frame.
    ///
    /// `Ok(None)` means the stream has ended and will not produce more
    /// frames. `Err` means the device failed.
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Releases the device. Called once when the capture loop stops;
    /// must be safe to call more than once.
    fn release(&mut self);

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        (**self).next_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

// =============================================================================
// Image Sequence
// =============================================================================

/// Replays still images as frames.
///
/// Used for testing a setup without a camera and for re-running a batch of
/// photos taken on another device.
#[derive(Debug)]
pub struct ImageSequenceSource {
    label: String,
    paths: Vec<PathBuf>,
    next: usize,
    sequence: u64,
    released: bool,
}

impl ImageSequenceSource {
    /// Every image file in `dir` (not recursive), in lexical file-name order.
    pub fn from_dir(dir: &Path) -> Result<Self, CaptureError> {
        let entries = fs::read_dir(dir).map_err(|e| CaptureError::SourceMissing {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && is_image_file(path))
            .collect();
        paths.sort();

        debug!(dir = %dir.display(), images = paths.len(), "Image sequence opened");

        Ok(ImageSequenceSource {
            label: format!("images in {}", dir.display()),
            paths,
            next: 0,
            sequence: 0,
            released: false,
        })
    }

    /// Exactly these files, in the given order.
    pub fn from_paths(paths: Vec<PathBuf>) -> Self {
        ImageSequenceSource {
            label: format!("{} image file(s)", paths.len()),
            paths,
            next: 0,
            sequence: 0,
            released: false,
        }
    }

    /// Number of files not yet read.
    pub fn remaining(&self) -> usize {
        self.paths.len().saturating_sub(self.next)
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for ImageSequenceSource {
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
        while !self.released && self.next < self.paths.len() {
            let path = &self.paths[self.next];
            self.next += 1;

            match image::open(path) {
                Ok(image) => {
                    self.sequence += 1;
                    debug!(path = %path.display(), sequence = self.sequence, "Frame loaded");
                    return Ok(Some(Frame::from_dynamic(image, self.sequence)));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable image");
                }
            }
        }
        Ok(None)
    }

    fn release(&mut self) {
        self.released = true;
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma};
    use tempfile::tempdir;

    fn save_png(dir: &Path, name: &str, shade: u8) -> PathBuf {
        let path = dir.join(name);
        GrayImage::from_pixel(8, 8, Luma([shade])).save(&path).unwrap();
        path
    }

    #[test]
    fn test_from_dir_lexical_order_and_filtering() {
        let dir = tempdir().unwrap();
        save_png(dir.path(), "b.png", 20);
        save_png(dir.path(), "a.PNG", 10);
        fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

        let mut source = ImageSequenceSource::from_dir(dir.path()).unwrap();
        assert_eq!(source.remaining(), 2);

        let first = source.next_frame().unwrap().unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(first.image.get_pixel(0, 0).0, [10]);

        let second = source.next_frame().unwrap().unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(second.image.get_pixel(0, 0).0, [20]);

        assert!(source.next_frame().unwrap().is_none());
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_unreadable_image_is_skipped() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("broken.png");
        fs::write(&broken, b"definitely not a png").unwrap();
        let good = save_png(dir.path(), "good.png", 0);

        let mut source = ImageSequenceSource::from_paths(vec![broken, good]);
        let frame = source.next_frame().unwrap().unwrap();
        assert_eq!(frame.sequence, 1);
        assert!(source.next_frame().unwrap().is_none());
    }

    #[test]
    fn test_missing_dir_is_capture_error() {
        let dir = tempdir().unwrap();
        let err = ImageSequenceSource::from_dir(&dir.path().join("nope")).unwrap_err();
        assert!(matches!(err, CaptureError::SourceMissing { .. }));
    }

    #[test]
    fn test_release_ends_stream() {
        let dir = tempdir().unwrap();
        let path = save_png(dir.path(), "a.png", 0);

        let mut source = ImageSequenceSource::from_paths(vec![path]);
        source.release();
        source.release();

        assert!(source.is_released());
        assert!(source.next_frame().unwrap().is_none());
    }
}

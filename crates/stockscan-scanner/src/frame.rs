//! Captured frames.

use chrono::{DateTime, Utc};
use image::{DynamicImage, GrayImage};

/// One still image from a capture source, reduced to luma.
#[derive(Debug, Clone)]
pub struct Frame {
    /// 8-bit grayscale pixels. Barcode detection only needs luminance.
    pub image: GrayImage,

    /// Position in the source's stream, starting at 1.
    pub sequence: u64,

    /// When the frame was acquired.
    pub captured_at: DateTime<Utc>,
}

impl Frame {
    /// Wraps a grayscale image captured now.
    pub fn new(image: GrayImage, sequence: u64) -> Self {
        Frame {
            image,
            sequence,
            captured_at: Utc::now(),
        }
    }

    /// Converts any decoded image to a frame.
    pub fn from_dynamic(image: DynamicImage, sequence: u64) -> Self {
        Frame::new(image.to_luma8(), sequence)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_from_dynamic_converts_to_luma() {
        let rgb = RgbImage::from_pixel(4, 3, Rgb([255, 255, 255]));
        let frame = Frame::from_dynamic(DynamicImage::ImageRgb8(rgb), 7);

        assert_eq!((frame.width(), frame.height()), (4, 3));
        assert_eq!(frame.sequence, 7);
        assert_eq!(frame.image.get_pixel(0, 0).0, [255]);
    }
}

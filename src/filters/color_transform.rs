//! Linear color transformation: 3x3 channel-mixing matrices, Sepia.
//!
//! Each output channel is the dot product of one matrix row with the input
//! `(R, G, B)` triple, truncated toward zero and clamped to 0-255.

use super::ImageFilter;
use crate::image::{truncate_channel, Image, Pixel};

/// Sepia tone matrix.
pub const SEPIA_MATRIX: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Filter applying a fixed 3x3 color matrix to every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTransformFilter {
    matrix: [[f64; 3]; 3],
}

impl ColorTransformFilter {
    /// Create a filter from a row-major 3x3 matrix.
    pub const fn new(matrix: [[f64; 3]; 3]) -> Self {
        Self { matrix }
    }

    /// Fixed sepia filter.
    pub const fn sepia() -> Self {
        Self::new(SEPIA_MATRIX)
    }

    /// Transform a single pixel.
    #[inline]
    pub fn transform(&self, p: Pixel) -> Pixel {
        let (r, g, b) = (p.red as f64, p.green as f64, p.blue as f64);
        let row = |i: usize| {
            let m = &self.matrix[i];
            truncate_channel(m[0] * r + m[1] * g + m[2] * b)
        };
        Pixel::new(row(0), row(1), row(2))
    }
}

impl ImageFilter for ColorTransformFilter {
    fn apply(&self, image: &Image) -> Image {
        log::debug!("color transform on {}x{} image", image.width(), image.height());
        image.map_pixels(|p| self.transform(p))
    }
}

/// Apply the sepia tone.
pub fn sepia(image: &Image) -> Image {
    ColorTransformFilter::sepia().apply(image)
}

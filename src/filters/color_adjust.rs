//! Color adjustment filters: Brightness.
//!
//! Pixel-wise operations that don't require spatial context.

use super::ImageFilter;
use crate::image::{clamp_channel, Image, Pixel};

// ============================================================================
// Brightness
// ============================================================================

/// Adds a constant to every channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Brighten {
    increment: i32,
}

impl Brighten {
    /// Create a brightness filter. Negative increments darken.
    pub const fn new(increment: i32) -> Self {
        Self { increment }
    }
}

impl ImageFilter for Brighten {
    fn apply(&self, image: &Image) -> Image {
        let increment = self.increment;
        image.map_pixels(move |p| {
            Pixel::new(
                clamp_channel((p.red as i32).saturating_add(increment)),
                clamp_channel((p.green as i32).saturating_add(increment)),
                clamp_channel((p.blue as i32).saturating_add(increment)),
            )
        })
    }
}

/// Adjust image brightness.
///
/// # Arguments
/// * `image` - Source image
/// * `increment` - Value added to every channel, result clamped to 0-255
///
/// # Returns
/// Brightness-adjusted image
pub fn brighten(image: &Image, increment: i32) -> Image {
    log::debug!("brighten by {increment}");
    Brighten::new(increment).apply(image)
}

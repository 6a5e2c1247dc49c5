//! Filter modules for pixel-grid transformations.
//!
//! ## Image Format
//!
//! Every filter consumes an [`Image`] of 8-bit RGB pixels and returns a new
//! image of identical dimensions. Inputs are never mutated.
//!
//! ## Filter Families
//!
//! - **Convolution**: [`kernel::KernelFilter`] with the fixed
//!   [`kernel::blur`] and [`kernel::sharpen`] instances
//! - **Linear color**: [`color_transform::ColorTransformFilter`] with the
//!   fixed [`color_transform::sepia`] instance
//! - **Projection**: [`grayscale::GreyscaleFilter`], one of six components
//! - **Tonal**: [`levels::Levels`] quadratic tone curve,
//!   [`color_adjust::brighten`]
//! - **Geometry and channels**: flips, RGB split/combine in [`geometry`]
//!
//! Per-pixel work is spread over rows with rayon; results are identical to a
//! sequential pass.

use crate::image::Image;

pub mod color_adjust;
pub mod color_transform;
pub mod geometry;
pub mod grayscale;
pub mod kernel;
pub mod levels;

/// A transformation that maps one image to a new image of the same size.
pub trait ImageFilter {
    /// Apply the filter, returning a new image.
    fn apply(&self, image: &Image) -> Image;
}

//! WebAssembly exports for PixelStag operations.
//!
//! These functions are exposed to JavaScript via wasm-bindgen.
//!
//! ## Buffer Layout
//!
//! Images cross the boundary as flat RGB bytes in row-major order
//! (length = width * height * 3). Every export returns a fresh buffer of
//! the same layout, or throws a string error.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::compression;
use crate::error::ImageError;
use crate::filters::{color_adjust, color_transform, geometry, grayscale, kernel, levels};
use crate::histogram;
use crate::image::{checked_buffer_len, Image, CHANNELS};
use crate::split_view;

fn js_error(err: ImageError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn to_image(data: &[u8], width: usize, height: usize) -> Result<Image, JsValue> {
    let expected = checked_buffer_len(width, height).map_err(js_error)?;
    if data.len() != expected {
        return Err(js_error(ImageError::InvalidBufferLength(data.len(), expected)));
    }
    let array = Array3::from_shape_vec((height, width, CHANNELS), data.to_vec())
        .map_err(|_| js_error(ImageError::InvalidBufferLength(data.len(), expected)))?;
    Image::from_array(array).map_err(js_error)
}

fn to_bytes(image: &Image) -> Vec<u8> {
    image.as_array().iter().copied().collect()
}

// ============================================================================
// Convolution
// ============================================================================

/// Apply the 3x3 blur kernel.
///
/// # Arguments
/// * `data` - Flat array of RGB bytes (length = width * height * 3)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
///
/// # Returns
/// Flat array of blurred RGB bytes
#[wasm_bindgen]
pub fn blur_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&kernel::blur(&image)))
}

/// Apply the 5x5 sharpen kernel.
#[wasm_bindgen]
pub fn sharpen_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&kernel::sharpen(&image)))
}

// ============================================================================
// Color
// ============================================================================

/// Apply the sepia tone.
#[wasm_bindgen]
pub fn sepia_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&color_transform::sepia(&image)))
}

/// Extract a greyscale component such as `"luma-component"`.
#[wasm_bindgen]
pub fn greyscale_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    component: &str,
) -> Result<Vec<u8>, JsValue> {
    let component: grayscale::GreyscaleComponent = component.parse().map_err(js_error)?;
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&grayscale::greyscale(&image, component)))
}

/// Add `increment` to every channel.
#[wasm_bindgen]
pub fn brighten_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    increment: i32,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&color_adjust::brighten(&image, increment)))
}

/// Quadratic levels adjustment through black, mid and white points.
#[wasm_bindgen]
pub fn adjust_levels_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    black: i32,
    mid: i32,
    white: i32,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    let result = levels::adjust_levels(&image, black, mid, white).map_err(js_error)?;
    Ok(to_bytes(&result))
}

// ============================================================================
// Geometry
// ============================================================================

/// Mirror left to right.
#[wasm_bindgen]
pub fn horizontal_flip_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&geometry::horizontal_flip(&image)))
}

/// Mirror top to bottom.
#[wasm_bindgen]
pub fn vertical_flip_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&geometry::vertical_flip(&image)))
}

// ============================================================================
// Histogram
// ============================================================================

/// Per-channel counts, 256 red bins then 256 green then 256 blue.
#[wasm_bindgen]
pub fn histogram_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u32>, JsValue> {
    let image = to_image(data, width, height)?;
    let hist = histogram::histogram(&image);
    Ok(histogram::Channel::ALL
        .iter()
        .flat_map(|&c| hist.counts(c).iter().map(|&n| n as u32))
        .collect())
}

/// Render the histogram chart (256 x 256 RGB bytes).
#[wasm_bindgen]
pub fn visualize_histogram_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&histogram::visualize(&image)))
}

/// Align the histogram peaks of the three channels.
#[wasm_bindgen]
pub fn color_correct_wasm(data: &[u8], width: usize, height: usize) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    Ok(to_bytes(&histogram::color_correct(&image)))
}

// ============================================================================
// Compression & Split View
// ============================================================================

/// Discard `percentage` percent of the Haar wavelet coefficients.
#[wasm_bindgen]
pub fn compress_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    percentage: f64,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    let result = compression::compress(&image, percentage).map_err(js_error)?;
    Ok(to_bytes(&result))
}

/// Apply a named operation to the left `width_percentage` of the image.
#[wasm_bindgen]
pub fn split_view_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    operation: &str,
    width_percentage: f64,
) -> Result<Vec<u8>, JsValue> {
    let image = to_image(data, width, height)?;
    let result =
        split_view::split_view_named(operation, &image, width_percentage).map_err(js_error)?;
    Ok(to_bytes(&result))
}

//! PixelStag
//!
//! Deterministic pixel-grid transformations with Python bindings via PyO3
//! and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Every image is 8-bit RGB stored as an `Array3<u8>` of shape
//! (height, width, 3). Bindings accept and return the same layout: numpy
//! arrays of shape (H, W, 3) in Python, flat row-major RGB bytes in WASM.
//!
//! ## Operations
//! - Convolution: blur, sharpen and custom odd-sized kernels
//! - Color: sepia, six greyscale projections, brightness, levels
//! - Geometry: horizontal/vertical flip, RGB split and combine
//! - Histogram: per-channel counts, 256x256 chart, peak color correction
//! - Compression: Haar wavelet coefficient thresholding
//! - Split view: preview any of the above on the left part of an image
//!
//! All operations take images by reference and return new images.

pub mod compression;
pub mod error;
pub mod filters;
pub mod histogram;
pub mod image;
pub mod split_view;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::ImageError;
pub use filters::ImageFilter;
pub use histogram::Histogram;
pub use image::{Image, Pixel};
pub use split_view::Operation;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::compression;
    use crate::error::ImageError;
    use crate::filters::{color_adjust, color_transform, geometry, grayscale, kernel, levels};
    use crate::histogram::{self as histogram_mod, Channel};
    use crate::image::Image;
    use crate::split_view as split_view_mod;

    impl From<ImageError> for PyErr {
        fn from(err: ImageError) -> Self {
            PyValueError::new_err(err.to_string())
        }
    }

    fn to_image(array: PyReadonlyArray3<'_, u8>) -> PyResult<Image> {
        Ok(Image::from_array(array.as_array().to_owned())?)
    }

    fn to_py<'py>(py: Python<'py>, image: Image) -> Bound<'py, PyArray3<u8>> {
        let array = image.into_array();
        if array.is_standard_layout() {
            array.into_pyarray(py)
        } else {
            array.as_standard_layout().into_owned().into_pyarray(py)
        }
    }

    // ========================================================================
    // Convolution
    // ========================================================================

    /// Apply the 3x3 blur kernel.
    #[pyfunction]
    pub fn blur<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, kernel::blur(&image)))
    }

    /// Apply the 5x5 sharpen kernel.
    #[pyfunction]
    pub fn sharpen<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, kernel::sharpen(&image)))
    }

    /// Convolve with a custom square kernel of odd side length.
    ///
    /// # Arguments
    /// * `image` - RGB image (H, W, 3)
    /// * `weights` - Kernel rows; `weights[i][j]` weighs the pixel at x offset i, y offset j
    #[pyfunction]
    pub fn convolve<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        weights: Vec<Vec<f64>>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let weights = kernel::Kernel::new(&weights)?;
        let image = to_image(image)?;
        Ok(to_py(py, kernel::convolve(&image, &weights)))
    }

    // ========================================================================
    // Color
    // ========================================================================

    /// Apply the sepia tone.
    #[pyfunction]
    pub fn sepia<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, color_transform::sepia(&image)))
    }

    /// Extract a greyscale component, e.g. `"luma-component"`.
    #[pyfunction]
    pub fn greyscale<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        component: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let component: grayscale::GreyscaleComponent = component.parse()?;
        let image = to_image(image)?;
        Ok(to_py(py, grayscale::greyscale(&image, component)))
    }

    /// Add `increment` to every channel, clamped to 0-255.
    #[pyfunction]
    pub fn brighten<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        increment: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, color_adjust::brighten(&image, increment)))
    }

    /// Remap channels through the quadratic curve fitted to black, mid and white.
    #[pyfunction]
    pub fn adjust_levels<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        black: i32,
        mid: i32,
        white: i32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, levels::adjust_levels(&image, black, mid, white)?))
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Mirror left to right.
    #[pyfunction]
    pub fn horizontal_flip<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, geometry::horizontal_flip(&image)))
    }

    /// Mirror top to bottom.
    #[pyfunction]
    pub fn vertical_flip<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, geometry::vertical_flip(&image)))
    }

    /// Split into red-only, green-only and blue-only images.
    #[pyfunction]
    #[allow(clippy::type_complexity)]
    pub fn rgb_split<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<(
        Bound<'py, PyArray3<u8>>,
        Bound<'py, PyArray3<u8>>,
        Bound<'py, PyArray3<u8>>,
    )> {
        let image = to_image(image)?;
        let (r, g, b) = geometry::rgb_split(&image);
        Ok((to_py(py, r), to_py(py, g), to_py(py, b)))
    }

    /// Take red from the first image, green from the second, blue from the third.
    #[pyfunction]
    pub fn rgb_combine<'py>(
        py: Python<'py>,
        red: PyReadonlyArray3<'py, u8>,
        green: PyReadonlyArray3<'py, u8>,
        blue: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let combined = geometry::rgb_combine(&to_image(red)?, &to_image(green)?, &to_image(blue)?)?;
        Ok(to_py(py, combined))
    }

    // ========================================================================
    // Histogram
    // ========================================================================

    /// Per-channel counts as three lists of 256 bins (R, G, B).
    #[pyfunction]
    pub fn histogram<'py>(image: PyReadonlyArray3<'py, u8>) -> PyResult<Vec<Vec<usize>>> {
        let hist = histogram_mod::histogram(&to_image(image)?);
        Ok(Channel::ALL
            .iter()
            .map(|&c| hist.counts(c).to_vec())
            .collect())
    }

    /// Render the histogram as a 256x256 chart.
    #[pyfunction]
    pub fn visualize_histogram<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, histogram_mod::visualize(&image)))
    }

    /// Align the histogram peaks of the three channels.
    #[pyfunction]
    pub fn color_correct<'py>(py: Python<'py>, image: PyReadonlyArray3<'py, u8>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, histogram_mod::color_correct(&image)))
    }

    // ========================================================================
    // Compression & Split View
    // ========================================================================

    /// Discard `percentage` percent of the Haar wavelet coefficients.
    #[pyfunction]
    pub fn compress<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        percentage: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, compression::compress(&image, percentage)?))
    }

    /// Apply a named operation to the left `width_percentage` of the image.
    #[pyfunction]
    pub fn split_view<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        operation: &str,
        width_percentage: f64,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let image = to_image(image)?;
        Ok(to_py(py, split_view_mod::split_view_named(operation, &image, width_percentage)?))
    }

    // ========================================================================
    // Transport Form
    // ========================================================================

    /// Parse the line-based raw form (width, height, then one line per row).
    #[pyfunction]
    pub fn from_raw_lines<'py>(py: Python<'py>, lines: Vec<String>) -> PyResult<Bound<'py, PyArray3<u8>>> {
        Ok(to_py(py, Image::from_raw_lines(lines.as_slice())?))
    }

    /// Encode an image into the line-based raw form.
    #[pyfunction]
    pub fn to_raw_lines<'py>(image: PyReadonlyArray3<'py, u8>) -> PyResult<Vec<String>> {
        Ok(to_image(image)?.to_raw_lines())
    }

    /// Python module definition
    #[pymodule]
    pub fn pixelstag(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Convolution
        m.add_function(wrap_pyfunction!(blur, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen, m)?)?;
        m.add_function(wrap_pyfunction!(convolve, m)?)?;

        // Color
        m.add_function(wrap_pyfunction!(sepia, m)?)?;
        m.add_function(wrap_pyfunction!(greyscale, m)?)?;
        m.add_function(wrap_pyfunction!(brighten, m)?)?;
        m.add_function(wrap_pyfunction!(adjust_levels, m)?)?;

        // Geometry
        m.add_function(wrap_pyfunction!(horizontal_flip, m)?)?;
        m.add_function(wrap_pyfunction!(vertical_flip, m)?)?;
        m.add_function(wrap_pyfunction!(rgb_split, m)?)?;
        m.add_function(wrap_pyfunction!(rgb_combine, m)?)?;

        // Histogram
        m.add_function(wrap_pyfunction!(histogram, m)?)?;
        m.add_function(wrap_pyfunction!(visualize_histogram, m)?)?;
        m.add_function(wrap_pyfunction!(color_correct, m)?)?;

        // Compression & split view
        m.add_function(wrap_pyfunction!(compress, m)?)?;
        m.add_function(wrap_pyfunction!(split_view, m)?)?;

        // Transport form
        m.add_function(wrap_pyfunction!(from_raw_lines, m)?)?;
        m.add_function(wrap_pyfunction!(to_raw_lines, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::pixelstag;

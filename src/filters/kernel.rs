//! Convolution kernel filters: Blur, Sharpen and custom kernels.
//!
//! A kernel is a square matrix of real weights with an odd side length
//! `2k + 1`, centered on the output pixel.
//!
//! ## Boundary Handling
//!
//! Kernel cells that fall outside the image are skipped. The remaining
//! weights are NOT renormalized, so edge pixels receive a partial sum:
//! a blurred border is darker than a blurred interior of the same color.
//!
//! Each accumulated channel is truncated toward zero and clamped to 0-255.

use ndarray::{Array2, Array3, Axis, Zip};

use super::ImageFilter;
use crate::error::ImageError;
use crate::image::{truncate_channel, Image, CHANNELS};

/// 3x3 Gaussian-style averaging kernel, weights sum to 1.
const BLUR_KERNEL: [[f64; 3]; 3] = [
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
    [1.0 / 8.0, 1.0 / 4.0, 1.0 / 8.0],
    [1.0 / 16.0, 1.0 / 8.0, 1.0 / 16.0],
];

/// 5x5 edge-enhancement kernel (not normalized).
const SHARPEN_KERNEL: [[f64; 5]; 5] = [
    [-1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0],
    [-1.0 / 8.0, 1.0 / 4.0, 1.0 / 4.0, 1.0 / 4.0, -1.0 / 8.0],
    [-1.0 / 8.0, 1.0 / 4.0, 1.0, 1.0 / 4.0, -1.0 / 8.0],
    [-1.0 / 8.0, 1.0 / 4.0, 1.0 / 4.0, 1.0 / 4.0, -1.0 / 8.0],
    [-1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0, -1.0 / 8.0],
];

/// A validated square convolution kernel with odd side length.
///
/// Cell `[[i, j]]` weighs the source pixel at `(x + i - k, y + j - k)`,
/// i.e. the first axis runs along x.
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    weights: Array2<f64>,
}

impl Kernel {
    /// Build a kernel from rows of weights.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidKernel`] if the rows do not form a square
    /// matrix with an odd side length.
    pub fn new(rows: &[Vec<f64>]) -> Result<Self, ImageError> {
        let side = rows.len();
        if side % 2 == 0 {
            return Err(ImageError::InvalidKernel {
                rows: side,
                cols: rows.first().map_or(0, Vec::len),
            });
        }
        if let Some(row) = rows.iter().find(|r| r.len() != side) {
            return Err(ImageError::InvalidKernel {
                rows: side,
                cols: row.len(),
            });
        }

        let flat: Vec<f64> = rows.iter().flatten().copied().collect();
        let weights = Array2::from_shape_vec((side, side), flat).map_err(|_| {
            ImageError::InvalidKernel {
                rows: side,
                cols: side,
            }
        })?;
        Ok(Self { weights })
    }

    /// Build a kernel from a 2D array.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidKernel`] unless the array is square with an
    /// odd side length.
    pub fn from_array(weights: Array2<f64>) -> Result<Self, ImageError> {
        let (rows, cols) = weights.dim();
        if rows != cols || rows % 2 == 0 {
            return Err(ImageError::InvalidKernel { rows, cols });
        }
        Ok(Self { weights })
    }

    fn from_const<const N: usize>(weights: &[[f64; N]; N]) -> Self {
        Self {
            weights: Array2::from_shape_fn((N, N), |(i, j)| weights[i][j]),
        }
    }

    /// Side length `2k + 1`.
    pub fn side(&self) -> usize {
        self.weights.dim().0
    }

    /// Half-width `k`.
    pub fn radius(&self) -> usize {
        self.side() / 2
    }

    /// Weight at kernel cell `(i, j)`.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        self.weights[[i, j]]
    }
}

/// Convolution filter owning its kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelFilter {
    kernel: Kernel,
}

impl KernelFilter {
    /// Wrap an already validated kernel.
    pub fn new(kernel: Kernel) -> Self {
        Self { kernel }
    }

    /// Fixed 3x3 Gaussian blur.
    pub fn blur() -> Self {
        Self::new(Kernel::from_const(&BLUR_KERNEL))
    }

    /// Fixed 5x5 sharpen.
    pub fn sharpen() -> Self {
        Self::new(Kernel::from_const(&SHARPEN_KERNEL))
    }

    /// The kernel this filter convolves with.
    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }
}

impl ImageFilter for KernelFilter {
    fn apply(&self, image: &Image) -> Image {
        convolve(image, &self.kernel)
    }
}

/// Convolve every channel of `image` with `kernel`.
///
/// # Arguments
/// * `image` - Source image
/// * `kernel` - Validated odd-sized kernel
///
/// # Returns
/// New image with the same dimensions
pub fn convolve(image: &Image, kernel: &Kernel) -> Image {
    let (width, height) = image.size();
    log::debug!(
        "convolving {}x{} image with {}x{} kernel",
        width,
        height,
        kernel.side(),
        kernel.side()
    );

    let input = image.as_array();
    let radius = kernel.radius() as isize;
    let mut output = Array3::<u8>::zeros((height, width, CHANNELS));

    Zip::indexed(output.lanes_mut(Axis(2))).par_for_each(|(y, x), mut out| {
        let mut sum = [0.0f64; CHANNELS];
        for i in -radius..=radius {
            for j in -radius..=radius {
                let nx = x as isize + i;
                let ny = y as isize + j;
                if nx < 0 || nx >= width as isize || ny < 0 || ny >= height as isize {
                    continue;
                }
                let weight = kernel.weight((i + radius) as usize, (j + radius) as usize);
                for (c, acc) in sum.iter_mut().enumerate() {
                    *acc += weight * input[[ny as usize, nx as usize, c]] as f64;
                }
            }
        }
        for (c, acc) in sum.iter().enumerate() {
            out[c] = truncate_channel(*acc);
        }
    });

    Image::from_array_unchecked(output)
}

/// Apply the fixed 3x3 blur.
pub fn blur(image: &Image) -> Image {
    KernelFilter::blur().apply(image)
}

/// Apply the fixed 5x5 sharpen.
pub fn sharpen(image: &Image) -> Image {
    KernelFilter::sharpen().apply(image)
}

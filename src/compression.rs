//! Lossy image compression with a 2D Haar wavelet.
//!
//! Each channel is copied into a square plane whose side is the smallest
//! power of two covering the image, zero-padded. The plane is transformed
//! with an orthonormal multi-level Haar transform, the smallest-magnitude
//! coefficients are discarded, and the plane is transformed back.
//!
//! ## Coefficient Selection
//!
//! All distinct non-zero magnitudes of the three planes are sorted
//! ascending. For a percentage `p` the threshold is the magnitude at index
//! `floor(count * p / 100)`, clamped to the last index, and every
//! coefficient whose magnitude does not exceed it is zeroed. At 100% every
//! coefficient goes and the result is black. Planes with no non-zero
//! coefficient are left untouched.
//!
//! ## Plane Layout
//!
//! Planes are indexed `[[x, y]]`. Every level transforms whole rows and
//! columns of the plane, not only the shrinking low-frequency corner.

use std::f64::consts::SQRT_2;

use ndarray::{Array2, ArrayViewMut1, Axis};
use rayon::prelude::*;

use crate::error::ImageError;
use crate::image::{truncate_channel, Image, Pixel, CHANNELS};

/// Side of the square power-of-two plane that covers a `width` x `height`
/// image.
pub fn padded_side(width: usize, height: usize) -> usize {
    width.max(height).max(1).next_power_of_two()
}

// ============================================================================
// 1D Haar steps
// ============================================================================

/// Replace `lane` by its pairwise averages followed by its pairwise
/// differences, both scaled by `1/sqrt(2)`.
fn haar_step(mut lane: ArrayViewMut1<'_, f64>) {
    let half = lane.len() / 2;
    let mut out = vec![0.0; lane.len()];
    for i in 0..half {
        let (a, b) = (lane[2 * i], lane[2 * i + 1]);
        out[i] = (a + b) / SQRT_2;
        out[half + i] = (a - b) / SQRT_2;
    }
    for (dst, src) in lane.iter_mut().zip(out) {
        *dst = src;
    }
}

/// Inverse of [`haar_step`].
fn inverse_haar_step(mut lane: ArrayViewMut1<'_, f64>) {
    let half = lane.len() / 2;
    let mut out = vec![0.0; lane.len()];
    for i in 0..half {
        let (avg, diff) = (lane[i], lane[half + i]);
        out[2 * i] = (avg + diff) / SQRT_2;
        out[2 * i + 1] = (avg - diff) / SQRT_2;
    }
    for (dst, src) in lane.iter_mut().zip(out) {
        *dst = src;
    }
}

// ============================================================================
// 2D transform
// ============================================================================

/// Forward multi-level Haar transform of a square power-of-two plane.
///
/// Level `c` (starting at the full side and halving) transforms rows
/// `0..c` along y, then columns `0..c` along x.
pub fn haar_forward(plane: &mut Array2<f64>) {
    let side = plane.dim().0;
    debug_assert_eq!(plane.dim(), (side, side));
    debug_assert!(side.is_power_of_two());

    let mut c = side;
    while c > 1 {
        for x in 0..c {
            haar_step(plane.index_axis_mut(Axis(0), x));
        }
        for y in 0..c {
            haar_step(plane.index_axis_mut(Axis(1), y));
        }
        c /= 2;
    }
}

/// Inverse of [`haar_forward`].
pub fn haar_inverse(plane: &mut Array2<f64>) {
    let side = plane.dim().0;
    debug_assert_eq!(plane.dim(), (side, side));

    let mut c = 2;
    while c <= side {
        for y in 0..c {
            inverse_haar_step(plane.index_axis_mut(Axis(1), y));
        }
        for x in 0..c {
            inverse_haar_step(plane.index_axis_mut(Axis(0), x));
        }
        c *= 2;
    }
}

// ============================================================================
// Thresholding
// ============================================================================

/// Magnitude at or below which coefficients are discarded, or `None` if
/// every coefficient is already zero.
fn select_threshold(planes: &[Array2<f64>], percentage: f64) -> Option<f64> {
    let mut magnitudes: Vec<f64> = planes
        .iter()
        .flat_map(|p| p.iter())
        .filter(|&&v| v != 0.0)
        .map(|v| v.abs())
        .collect();
    if magnitudes.is_empty() {
        return None;
    }
    magnitudes.sort_by(f64::total_cmp);
    magnitudes.dedup();

    let count = magnitudes.len();
    let index = ((count as f64 * percentage / 100.0) as usize).min(count - 1);
    Some(magnitudes[index])
}

/// Compress `image` by discarding `percentage` percent of its distinct
/// wavelet coefficient magnitudes.
///
/// # Arguments
/// * `image` - Source image
/// * `percentage` - Share of coefficients to discard, 0 to 100
///
/// # Returns
/// A new image with the same dimensions
///
/// # Errors
/// Returns [`ImageError::InvalidPercentage`] if `percentage` is NaN or outside
/// 0 to 100.
pub fn compress(image: &Image, percentage: f64) -> Result<Image, ImageError> {
    if !(0.0..=100.0).contains(&percentage) {
        return Err(ImageError::InvalidPercentage(percentage));
    }
    if image.is_empty() {
        return Ok(image.clone());
    }

    let (width, height) = image.size();
    let side = padded_side(width, height);
    let source = image.as_array();
    log::debug!("compressing {width}x{height} image at {percentage}% on {side}x{side} planes");

    let mut planes: Vec<Array2<f64>> = (0..CHANNELS)
        .map(|c| {
            Array2::from_shape_fn((side, side), |(x, y)| {
                if x < width && y < height {
                    source[[y, x, c]] as f64
                } else {
                    0.0
                }
            })
        })
        .collect();

    planes.par_iter_mut().for_each(haar_forward);

    match select_threshold(&planes, percentage) {
        Some(threshold) => {
            log::trace!("discarding coefficients with magnitude <= {threshold}");
            planes.par_iter_mut().for_each(|plane| {
                plane.mapv_inplace(|v| if v.abs() <= threshold { 0.0 } else { v });
            });
        }
        None => log::trace!("all coefficients are zero, nothing to discard"),
    }

    planes.par_iter_mut().for_each(haar_inverse);

    Ok(Image::from_fn(width, height, |x, y| {
        Pixel::new(
            truncate_channel(planes[0][[x, y]]),
            truncate_channel(planes[1][[x, y]]),
            truncate_channel(planes[2][[x, y]]),
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn grey_image(rows: &[&[u8]]) -> Image {
        Image::from_fn(rows[0].len(), rows.len(), |x, y| Pixel::grey(rows[y][x]))
    }

    fn assert_grey_rows(image: &Image, expected: &[&[u8]]) {
        assert_eq!(image.size(), (expected[0].len(), expected.len()));
        for (y, row) in expected.iter().enumerate() {
            for (x, &v) in row.iter().enumerate() {
                assert_eq!(image.pixel(x, y), Pixel::grey(v), "mismatch at ({x}, {y})");
            }
        }
    }

    fn square_image() -> Image {
        grey_image(&[
            &[100, 150, 200, 50, 75],
            &[25, 175, 225, 125, 100],
            &[75, 125, 250, 200, 150],
            &[200, 100, 50, 175, 225],
            &[150, 50, 175, 225, 125],
        ])
    }

    #[test]
    fn test_padded_side() {
        assert_eq!(padded_side(5, 3), 8);
        assert_eq!(padded_side(4, 4), 4);
        assert_eq!(padded_side(1, 1), 1);
        assert_eq!(padded_side(0, 0), 1);
        assert_eq!(padded_side(3, 17), 32);
    }

    #[test]
    fn test_forward_inverse_is_exact() {
        let original = Array2::from_shape_fn((8, 8), |(x, y)| ((x * 37 + y * 11) % 256) as f64);
        let mut plane = original.clone();
        haar_forward(&mut plane);
        assert_ne!(plane, original);
        haar_inverse(&mut plane);
        for (a, b) in plane.iter().zip(original.iter()) {
            assert_abs_diff_eq!(*a, *b, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_forward_preserves_energy() {
        let original = Array2::from_shape_fn((4, 4), |(x, y)| (x * 4 + y) as f64);
        let mut plane = original.clone();
        haar_forward(&mut plane);
        let energy = |p: &Array2<f64>| p.iter().map(|v| v * v).sum::<f64>();
        assert_abs_diff_eq!(energy(&plane), energy(&original), epsilon = 1e-6);
    }

    #[test]
    fn test_constant_plane_has_single_coefficient() {
        let mut plane = Array2::from_elem((4, 4), 10.0);
        haar_forward(&mut plane);
        assert_abs_diff_eq!(plane[[0, 0]], 40.0, epsilon = 1e-9);
        for ((x, y), v) in plane.indexed_iter() {
            if (x, y) != (0, 0) {
                assert_abs_diff_eq!(*v, 0.0, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_compress_half() {
        let _ = env_logger::builder().is_test(true).try_init();
        let result = compress(&square_image(), 50.0).unwrap();
        assert_grey_rows(
            &result,
            &[
                &[66, 178, 172, 60, 59],
                &[13, 125, 253, 141, 57],
                &[85, 135, 250, 200, 181],
                &[194, 94, 63, 188, 179],
                &[112, 112, 170, 170, 39],
            ],
        );
    }

    #[test]
    fn test_compress_zero_drops_smallest_magnitude() {
        // The smallest distinct magnitude is always discarded
        let result = compress(&square_image(), 0.0).unwrap();
        assert_grey_rows(
            &result,
            &[
                &[103, 153, 199, 49, 74],
                &[21, 171, 224, 124, 99],
                &[71, 121, 249, 199, 149],
                &[203, 103, 49, 174, 224],
                &[146, 46, 174, 224, 124],
            ],
        );
    }

    #[test]
    fn test_compress_ninety_non_square() {
        let img = grey_image(&[
            &[100, 150, 200, 50, 75],
            &[200, 100, 50, 175, 225],
            &[150, 50, 175, 225, 125],
        ]);
        let result = compress(&img, 90.0).unwrap();
        assert_grey_rows(
            &result,
            &[
                &[82, 82, 82, 82, 32],
                &[82, 82, 82, 82, 32],
                &[82, 82, 82, 82, 32],
            ],
        );
    }

    #[test]
    fn test_compress_everything_is_black() {
        let result = compress(&square_image(), 100.0).unwrap();
        assert_eq!(result.size(), (5, 5));
        assert!(result.pixels().all(|p| p == Pixel::grey(0)));
    }

    #[test]
    fn test_compress_black_image() {
        let img = Image::from_fn(3, 2, |_, _| Pixel::grey(0));
        assert_eq!(compress(&img, 40.0).unwrap(), img);
    }

    #[test]
    fn test_compress_empty_image() {
        let img = Image::new(0, 0, vec![]).unwrap();
        assert!(compress(&img, 50.0).unwrap().is_empty());
    }

    #[test]
    fn test_compress_rejects_bad_percentage() {
        let img = square_image();
        assert_eq!(
            compress(&img, 100.5),
            Err(ImageError::InvalidPercentage(100.5))
        );
        assert!(compress(&img, -1.0).is_err());
        assert!(compress(&img, f64::NAN).is_err());
    }

    #[test]
    fn test_compress_does_not_mutate_source() {
        let img = square_image();
        let copy = img.clone();
        let _ = compress(&img, 75.0).unwrap();
        assert_eq!(img, copy);
    }
}

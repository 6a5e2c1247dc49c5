//! Levels filter: quadratic tone curve through black, mid and white points.
//!
//! The curve `y = a*x^2 + b*x + c` is fitted through `(black, 0)`,
//! `(mid, 128)` and `(white, 255)` by solving the 3x3 system in closed form,
//! then every channel value is remapped through it (truncate, clamp 0-255).

use super::ImageFilter;
use crate::error::ImageError;
use crate::image::{truncate_channel, Image, Pixel};

// ============================================================================
// Levels
// ============================================================================

/// Validated levels parameters with their precomputed lookup table.
#[derive(Debug, Clone, PartialEq)]
pub struct Levels {
    black: u8,
    mid: u8,
    white: u8,
    lut: [u8; 256],
}

impl Levels {
    /// Create a levels adjustment.
    ///
    /// # Arguments
    /// * `black` - Input value mapped to 0
    /// * `mid` - Input value mapped to 128
    /// * `white` - Input value mapped to 255
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidLevels`] unless
    /// `0 <= black < mid < white <= 255`.
    pub fn new(black: i32, mid: i32, white: i32) -> Result<Self, ImageError> {
        let in_range = |v: i32| (0..=255).contains(&v);
        if !(in_range(black) && in_range(mid) && in_range(white) && black < mid && mid < white) {
            return Err(ImageError::InvalidLevels { black, mid, white });
        }

        let (a, b, c) = fit_quadratic(black, mid, white);
        log::trace!("levels {black}/{mid}/{white}: a={a} b={b} c={c}");

        // Pre-compute lookup table for efficiency
        let mut lut = [0u8; 256];
        for (i, out) in lut.iter_mut().enumerate() {
            let x = i as f64;
            *out = truncate_channel(a * (x * x) + b * x + c);
        }

        Ok(Self {
            black: black as u8,
            mid: mid as u8,
            white: white as u8,
            lut,
        })
    }

    /// `(black, mid, white)` points.
    pub fn points(&self) -> (u8, u8, u8) {
        (self.black, self.mid, self.white)
    }

    /// Quadratic coefficients `(a, b, c)`.
    pub fn coefficients(&self) -> (f64, f64, f64) {
        fit_quadratic(self.black as i32, self.mid as i32, self.white as i32)
    }

    /// Remap a single channel value.
    #[inline]
    pub fn map(&self, value: u8) -> u8 {
        self.lut[value as usize]
    }
}

/// Solve for `(a, b, c)` with Cramer's rule.
fn fit_quadratic(black: i32, mid: i32, white: i32) -> (f64, f64, f64) {
    let (b, m, w) = (black as f64, mid as f64, white as f64);
    let (bb, mm, ww) = (b * b, m * m, w * w);

    let det = bb * (m - w) - b * (mm - ww) + w * mm - m * ww;
    let det_a = -b * (128.0 - 255.0) + 128.0 * w - 255.0 * m;
    let det_b = bb * (128.0 - 255.0) + 255.0 * mm - 128.0 * ww;
    let det_c = bb * (255.0 * m - 128.0 * w) - b * (255.0 * mm - 128.0 * ww);

    (det_a / det, det_b / det, det_c / det)
}

impl ImageFilter for Levels {
    fn apply(&self, image: &Image) -> Image {
        log::debug!(
            "levels {}/{}/{} on {}x{} image",
            self.black,
            self.mid,
            self.white,
            image.width(),
            image.height()
        );
        image.map_pixels(|p| Pixel::new(self.map(p.red), self.map(p.green), self.map(p.blue)))
    }
}

/// Apply a levels adjustment.
///
/// # Errors
/// Returns [`ImageError::InvalidLevels`] before touching any pixel if the
/// points are out of range or not strictly increasing.
pub fn adjust_levels(image: &Image, black: i32, mid: i32, white: i32) -> Result<Image, ImageError> {
    Ok(Levels::new(black, mid, white)?.apply(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn planes(r: &[[u8; 5]; 2], g: &[[u8; 5]; 2], b: &[[u8; 5]; 2]) -> Image {
        Image::from_fn(5, 2, |x, y| Pixel::new(r[y][x], g[y][x], b[y][x]))
    }

    #[test]
    fn test_levels_reference_image() {
        let img = planes(
            &[[14, 189, 67, 200, 32], [123, 54, 88, 176, 99]],
            &[[85, 10, 190, 67, 143], [56, 123, 88, 33, 210]],
            &[[124, 201, 45, 98, 175], [33, 150, 92, 200, 42]],
        );
        let expected = planes(
            &[[0, 193, 27, 214, 1], [89, 16, 47, 170, 59]],
            &[[44, 0, 195, 27, 117], [18, 89, 47, 1, 234]],
            &[[90, 216, 9, 58, 168], [1, 128, 51, 214, 7]],
        );
        assert_eq!(adjust_levels(&img, 30, 150, 220).unwrap(), expected);
    }

    #[test]
    fn test_control_points() {
        let levels = Levels::new(10, 100, 200).unwrap();
        assert_eq!(levels.map(10), 0);
        assert_eq!(levels.map(100), 128);
        assert_eq!(levels.map(200), 255);
        // Outside the black/white points the curve is clamped
        assert_eq!(levels.map(0), 0);
        assert_eq!(levels.map(255), 255);
    }

    #[test]
    fn test_linear_ramp_is_identity() {
        let levels = Levels::new(0, 128, 255).unwrap();
        let (a, b, c) = levels.coefficients();
        assert_abs_diff_eq!(a, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(b, 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(c, 0.0, epsilon = 1e-12);
        for v in 0..=255u8 {
            assert_eq!(levels.map(v), v);
        }
    }

    #[test]
    fn test_mid_point_maps_to_128() {
        for (b, m, w) in [(0, 1, 255), (30, 150, 220), (100, 101, 102), (0, 200, 201)] {
            let levels = Levels::new(b, m, w).unwrap();
            let v = levels.map(m as u8) as i32;
            assert!((v - 128).abs() <= 1, "b={b} m={m} w={w} -> {v}");
        }
    }

    #[test]
    fn test_invalid_points() {
        let invalid = [
            (240, 100, 200),
            (40, 100, 40),
            (-90, 109, 250),
            (270, 899, 960),
            (900, 80, 98),
            (10, 10, 20),
        ];
        for (b, m, w) in invalid {
            assert_eq!(
                Levels::new(b, m, w),
                Err(ImageError::InvalidLevels {
                    black: b,
                    mid: m,
                    white: w
                })
            );
        }
    }

    #[test]
    fn test_invalid_points_leave_image_untouched() {
        let img = Image::from_fn(2, 2, |_, _| Pixel::grey(77));
        assert!(adjust_levels(&img, 5, 5, 5).is_err());
        assert_eq!(img.pixel(1, 1), Pixel::grey(77));
    }
}

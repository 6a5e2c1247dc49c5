//! Pixel and image value types.
//!
//! An [`Image`] is a fixed-size grid of RGB pixels backed by an
//! `Array3<u8>` of shape (height, width, 3). Pixels are addressed as
//! `(x, y)` with `x` in `0..width` and `y` in `0..height`.
//!
//! Images own their storage. Every operation in this crate reads an image by
//! reference and returns a freshly allocated one.

use ndarray::{s, Array3, ArrayView3, Axis, Zip};

use crate::error::ImageError;

pub mod raw;

/// Number of color channels carried by every pixel.
pub const CHANNELS: usize = 3;

/// BT.709 luma coefficients.
const LUMA_R: f64 = 0.2126;
const LUMA_G: f64 = 0.7152;
const LUMA_B: f64 = 0.0722;

/// Clamp a wide intermediate channel value into 0..=255.
#[inline]
pub fn clamp_channel(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Truncate a real channel value toward zero, then clamp it into 0..=255.
#[inline]
pub fn truncate_channel(value: f64) -> u8 {
    // `as i32` truncates toward zero and saturates on overflow
    clamp_channel(value as i32)
}

/// Number of channel bytes in a `width` x `height` image.
///
/// # Errors
/// Returns [`ImageError::ImageTooLarge`] if the count does not fit in `usize`.
pub fn checked_buffer_len(width: usize, height: usize) -> Result<usize, ImageError> {
    width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(CHANNELS))
        .ok_or(ImageError::ImageTooLarge { width, height })
}

/// A single RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Pixel {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
}

impl Pixel {
    /// Create a pixel from its three channels.
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Create a pixel with the same value in every channel.
    pub const fn grey(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Channels as an `[r, g, b]` array.
    pub const fn channels(&self) -> [u8; CHANNELS] {
        [self.red, self.green, self.blue]
    }

    /// Maximum of the three channels.
    pub fn value(&self) -> u8 {
        self.red.max(self.green).max(self.blue)
    }

    /// BT.709 luma, truncated.
    pub fn luma(&self) -> u8 {
        let luma = LUMA_R * self.red as f64 + LUMA_G * self.green as f64 + LUMA_B * self.blue as f64;
        luma as u8
    }

    /// Integer average of the three channels.
    pub fn intensity(&self) -> u8 {
        ((self.red as u32 + self.green as u32 + self.blue as u32) / 3) as u8
    }
}

/// A width x height grid of RGB pixels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Array3<u8>,
}

impl Image {
    /// Create an image from row-major pixels.
    ///
    /// # Arguments
    /// * `width` - Number of columns
    /// * `height` - Number of rows
    /// * `pixels` - `width * height` pixels, row by row
    ///
    /// # Errors
    /// Returns [`ImageError::ImageTooLarge`] if the dimensions overflow, or
    /// [`ImageError::InvalidBufferLength`] if the pixel count does not match
    /// them.
    pub fn new(width: usize, height: usize, pixels: Vec<Pixel>) -> Result<Self, ImageError> {
        let expected = checked_buffer_len(width, height)? / CHANNELS;
        if pixels.len() != expected {
            return Err(ImageError::InvalidBufferLength(pixels.len(), expected));
        }
        let flat: Vec<u8> = pixels.iter().flat_map(|p| p.channels()).collect();
        let data = Array3::from_shape_vec((height, width, CHANNELS), flat)
            .map_err(|_| ImageError::InvalidBufferLength(pixels.len(), expected))?;
        Ok(Self { data })
    }

    /// Create an image by evaluating `f(x, y)` once for every cell.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> Pixel,
    {
        let mut data = Array3::<u8>::zeros((height, width, CHANNELS));
        for y in 0..height {
            for x in 0..width {
                let p = f(x, y);
                data[[y, x, 0]] = p.red;
                data[[y, x, 1]] = p.green;
                data[[y, x, 2]] = p.blue;
            }
        }
        Self { data }
    }

    /// Wrap an `(height, width, 3)` array.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidChannelCount`] if the last axis is not 3.
    pub fn from_array(data: Array3<u8>) -> Result<Self, ImageError> {
        let channels = data.dim().2;
        if channels != CHANNELS {
            return Err(ImageError::InvalidChannelCount(channels));
        }
        Ok(Self { data })
    }

    /// Wrap an array already known to be `(height, width, 3)`.
    pub(crate) fn from_array_unchecked(data: Array3<u8>) -> Self {
        debug_assert_eq!(data.dim().2, CHANNELS);
        Self { data }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// `(width, height)` pair.
    pub fn size(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    /// `true` if the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Pixel at column `x`, row `y`.
    ///
    /// # Panics
    /// Panics if `(x, y)` lies outside the image.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Pixel {
        Pixel::new(
            self.data[[y, x, 0]],
            self.data[[y, x, 1]],
            self.data[[y, x, 2]],
        )
    }

    /// Iterate over the pixels in row-major order.
    pub fn pixels(&self) -> impl Iterator<Item = Pixel> + '_ {
        self.data
            .lanes(Axis(2))
            .into_iter()
            .map(|c| Pixel::new(c[0], c[1], c[2]))
    }

    /// Borrow the underlying `(height, width, 3)` array.
    pub fn as_array(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// Consume the image and return its array.
    pub fn into_array(self) -> Array3<u8> {
        self.data
    }

    /// Copy of the leftmost `width` columns (clamped to the image width).
    pub fn crop_left(&self, width: usize) -> Self {
        let width = width.min(self.width());
        Self {
            data: self.data.slice(s![.., ..width, ..]).to_owned(),
        }
    }

    /// Apply `f` to every pixel independently, rows in parallel.
    pub(crate) fn map_pixels<F>(&self, f: F) -> Self
    where
        F: Fn(Pixel) -> Pixel + Sync + Send,
    {
        let mut output = Array3::<u8>::zeros(self.data.raw_dim());
        Zip::from(output.lanes_mut(Axis(2)))
            .and(self.data.lanes(Axis(2)))
            .par_for_each(|mut out, src| {
                let p = f(Pixel::new(src[0], src[1], src[2]));
                out[0] = p.red;
                out[1] = p.green;
                out[2] = p.blue;
            });
        Self { data: output }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_derived_quantities() {
        let p = Pixel::new(200, 0, 100);
        assert_eq!(p.value(), 200);

        let p = Pixel::new(100, 150, 200);
        // 21.26 + 107.28 + 14.44 = 142.98
        assert_eq!(p.luma(), 142);
        assert_eq!(p.intensity(), 150);
    }

    #[test]
    fn test_intensity_truncates() {
        assert_eq!(Pixel::new(1, 1, 2).intensity(), 1);
        assert_eq!(Pixel::new(255, 255, 255).intensity(), 255);
    }

    #[test]
    fn test_channel_clamping() {
        assert_eq!(clamp_channel(-5), 0);
        assert_eq!(clamp_channel(300), 255);
        assert_eq!(truncate_channel(12.99), 12);
        assert_eq!(truncate_channel(-0.5), 0);
        assert_eq!(truncate_channel(255.7), 255);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Image::new(2, 2, vec![Pixel::default(); 3]).unwrap_err();
        assert_eq!(err, ImageError::InvalidBufferLength(3, 4));
    }

    #[test]
    fn test_pixel_addressing() {
        let img = Image::from_fn(3, 2, |x, y| Pixel::new(x as u8, y as u8, 7));
        assert_eq!(img.size(), (3, 2));
        assert_eq!(img.pixel(2, 1), Pixel::new(2, 1, 7));
        assert_eq!(img.as_array()[[1, 2, 0]], 2);

        let collected: Vec<Pixel> = img.pixels().collect();
        assert_eq!(collected.len(), 6);
        assert_eq!(collected[4], Pixel::new(1, 1, 7));
    }

    #[test]
    fn test_from_array_checks_channels() {
        let err = Image::from_array(Array3::<u8>::zeros((2, 2, 4))).unwrap_err();
        assert_eq!(err, ImageError::InvalidChannelCount(4));

        let array = Array3::<u8>::from_shape_fn((2, 5, 3), |(y, x, c)| (y * 15 + x * 3 + c) as u8);
        let img = Image::from_array(array.clone()).unwrap();
        assert_eq!(img.size(), (5, 2));
        assert_eq!(img.into_array(), array);
    }

    #[test]
    fn test_checked_buffer_len() {
        assert_eq!(checked_buffer_len(4, 2), Ok(24));
        assert_eq!(checked_buffer_len(0, usize::MAX), Ok(0));
        assert_eq!(
            checked_buffer_len(usize::MAX, 2),
            Err(ImageError::ImageTooLarge {
                width: usize::MAX,
                height: 2
            })
        );
        // The pixel count fits but the channel bytes do not
        assert!(checked_buffer_len(usize::MAX / 2, 1).is_err());
    }

    #[test]
    fn test_new_rejects_overflowing_dimensions() {
        assert!(matches!(
            Image::new(usize::MAX, usize::MAX, vec![]),
            Err(ImageError::ImageTooLarge { .. })
        ));
    }

    #[test]
    fn test_crop_left() {
        let img = Image::from_fn(4, 2, |x, _| Pixel::grey(x as u8 * 10));
        let crop = img.crop_left(2);
        assert_eq!(crop.size(), (2, 2));
        assert_eq!(crop.pixel(1, 1), Pixel::grey(10));
        assert!(img.crop_left(0).is_empty());
        assert_eq!(img.crop_left(10).size(), (4, 2));
    }

    #[test]
    fn test_map_pixels_does_not_touch_source() {
        let img = Image::from_fn(3, 3, |x, y| Pixel::grey((x + y) as u8));
        let mapped = img.map_pixels(|p| Pixel::grey(p.red + 1));
        assert_eq!(img.pixel(2, 2), Pixel::grey(4));
        assert_eq!(mapped.pixel(2, 2), Pixel::grey(5));
    }
}

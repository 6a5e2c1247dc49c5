//! Geometric and channel-layout operations: flips, RGB split and combine.

use ndarray::s;

use crate::error::ImageError;
use crate::image::{Image, Pixel};

/// Mirror the image left to right.
///
/// # Arguments
/// * `image` - The input image with shape (H, W, 3).
///
/// # Returns
/// The flipped image.
pub fn horizontal_flip(image: &Image) -> Image {
    let flipped = image.as_array().slice(s![.., ..;-1, ..]).to_owned();
    Image::from_array_unchecked(flipped)
}

/// Mirror the image top to bottom.
pub fn vertical_flip(image: &Image) -> Image {
    let flipped = image.as_array().slice(s![..;-1, .., ..]).to_owned();
    Image::from_array_unchecked(flipped)
}

/// Split an image into red-only, green-only and blue-only images.
///
/// # Returns
/// `(red, green, blue)` where each image keeps a single channel and zeroes
/// the other two.
pub fn rgb_split(image: &Image) -> (Image, Image, Image) {
    (
        image.map_pixels(|p| Pixel::new(p.red, 0, 0)),
        image.map_pixels(|p| Pixel::new(0, p.green, 0)),
        image.map_pixels(|p| Pixel::new(0, 0, p.blue)),
    )
}

/// Combine the red channel of `red`, the green channel of `green` and the
/// blue channel of `blue` into one image.
///
/// # Errors
/// Returns [`ImageError::DimensionMismatch`] if the three images differ in
/// size.
pub fn rgb_combine(red: &Image, green: &Image, blue: &Image) -> Result<Image, ImageError> {
    for other in [green, blue] {
        if other.size() != red.size() {
            return Err(ImageError::DimensionMismatch {
                expected: red.size(),
                actual: other.size(),
            });
        }
    }

    let (width, height) = red.size();
    Ok(Image::from_fn(width, height, |x, y| {
        Pixel::new(
            red.pixel(x, y).red,
            green.pixel(x, y).green,
            blue.pixel(x, y).blue,
        )
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Image {
        Image::from_fn(3, 2, |x, y| Pixel::new(x as u8, y as u8, (x * 10 + y) as u8))
    }

    #[test]
    fn test_horizontal_flip() {
        let img = sample();
        let flipped = horizontal_flip(&img);
        assert_eq!(flipped.size(), (3, 2));
        assert_eq!(flipped.pixel(0, 1), img.pixel(2, 1));
        assert_eq!(flipped.pixel(1, 0), img.pixel(1, 0));
        assert_eq!(horizontal_flip(&flipped), img);
    }

    #[test]
    fn test_vertical_flip() {
        let img = sample();
        let flipped = vertical_flip(&img);
        assert_eq!(flipped.pixel(2, 0), img.pixel(2, 1));
        assert_eq!(vertical_flip(&flipped), img);
    }

    #[test]
    fn test_flip_empty_image() {
        let img = Image::new(0, 0, vec![]).unwrap();
        assert!(horizontal_flip(&img).is_empty());
        assert!(vertical_flip(&img).is_empty());
    }

    #[test]
    fn test_split_channels() {
        let img = Image::new(1, 1, vec![Pixel::new(7, 255, 10)]).unwrap();
        let (r, g, b) = rgb_split(&img);
        assert_eq!(r.pixel(0, 0), Pixel::new(7, 0, 0));
        assert_eq!(g.pixel(0, 0), Pixel::new(0, 255, 0));
        assert_eq!(b.pixel(0, 0), Pixel::new(0, 0, 10));
    }

    #[test]
    fn test_split_combine_round_trip() {
        let img = sample();
        let (r, g, b) = rgb_split(&img);
        assert_eq!(rgb_combine(&r, &g, &b).unwrap(), img);
    }

    #[test]
    fn test_combine_takes_one_channel_from_each() {
        let full = Image::new(1, 1, vec![Pixel::new(1, 2, 3)]).unwrap();
        let other = Image::new(1, 1, vec![Pixel::new(4, 5, 6)]).unwrap();
        let combined = rgb_combine(&full, &other, &full).unwrap();
        assert_eq!(combined.pixel(0, 0), Pixel::new(1, 5, 3));
    }

    #[test]
    fn test_combine_rejects_size_mismatch() {
        let a = Image::from_fn(2, 2, |_, _| Pixel::default());
        let b = Image::from_fn(3, 2, |_, _| Pixel::default());
        assert_eq!(
            rgb_combine(&a, &a, &b),
            Err(ImageError::DimensionMismatch {
                expected: (2, 2),
                actual: (3, 2)
            })
        );
    }
}

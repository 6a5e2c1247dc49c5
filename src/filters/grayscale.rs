//! Greyscale extraction filter.
//!
//! Projects every pixel onto one of six single-value components:
//!
//! | Component   | Output                          |
//! |-------------|---------------------------------|
//! | `red`       | `(R, 0, 0)`                     |
//! | `green`     | `(0, G, 0)`                     |
//! | `blue`      | `(0, 0, B)`                     |
//! | `value`     | `max(R, G, B)` in all channels  |
//! | `luma`      | BT.709 luma in all channels     |
//! | `intensity` | `(R + G + B) / 3` in all channels |
//!
//! Components are named `red-component`, `green-component`, ... in their
//! textual form.

use std::fmt;
use std::str::FromStr;

use super::ImageFilter;
use crate::error::ImageError;
use crate::image::{Image, Pixel};

/// Which projection of a pixel to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreyscaleComponent {
    /// Red channel only.
    Red,
    /// Green channel only.
    Green,
    /// Blue channel only.
    Blue,
    /// Maximum channel.
    Value,
    /// BT.709 luma.
    Luma,
    /// Integer average.
    Intensity,
}

impl GreyscaleComponent {
    /// All components in declaration order.
    pub const ALL: [GreyscaleComponent; 6] = [
        Self::Red,
        Self::Green,
        Self::Blue,
        Self::Value,
        Self::Luma,
        Self::Intensity,
    ];

    /// Textual name, e.g. `"luma-component"`.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Red => "red-component",
            Self::Green => "green-component",
            Self::Blue => "blue-component",
            Self::Value => "value-component",
            Self::Luma => "luma-component",
            Self::Intensity => "intensity-component",
        }
    }

    /// Project a single pixel.
    #[inline]
    pub fn project(&self, p: Pixel) -> Pixel {
        match self {
            Self::Red => Pixel::new(p.red, 0, 0),
            Self::Green => Pixel::new(0, p.green, 0),
            Self::Blue => Pixel::new(0, 0, p.blue),
            Self::Value => Pixel::grey(p.value()),
            Self::Luma => Pixel::grey(p.luma()),
            Self::Intensity => Pixel::grey(p.intensity()),
        }
    }
}

impl FromStr for GreyscaleComponent {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| ImageError::UnknownComponent(s.to_string()))
    }
}

impl fmt::Display for GreyscaleComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filter producing a greyscale (or single-channel) image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreyscaleFilter {
    component: GreyscaleComponent,
}

impl GreyscaleFilter {
    /// Create a filter for `component`.
    pub const fn new(component: GreyscaleComponent) -> Self {
        Self { component }
    }

    /// Create a filter from a component name.
    ///
    /// # Errors
    /// Returns [`ImageError::UnknownComponent`] for an unrecognised name.
    pub fn from_name(name: &str) -> Result<Self, ImageError> {
        Ok(Self::new(name.parse()?))
    }
}

impl ImageFilter for GreyscaleFilter {
    fn apply(&self, image: &Image) -> Image {
        log::debug!(
            "greyscale {} on {}x{} image",
            self.component,
            image.width(),
            image.height()
        );
        let component = self.component;
        image.map_pixels(move |p| component.project(p))
    }
}

/// Extract `component` from every pixel of `image`.
pub fn greyscale(image: &Image, component: GreyscaleComponent) -> Image {
    GreyscaleFilter::new(component).apply(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(p: Pixel) -> Image {
        Image::new(1, 1, vec![p]).unwrap()
    }

    #[test]
    fn test_value_component() {
        let result = greyscale(&single(Pixel::new(200, 0, 100)), GreyscaleComponent::Value);
        assert_eq!(result.pixel(0, 0), Pixel::grey(200));
    }

    #[test]
    fn test_luma_component() {
        let result = greyscale(&single(Pixel::new(100, 150, 200)), GreyscaleComponent::Luma);
        assert_eq!(result.pixel(0, 0), Pixel::grey(142));
    }

    #[test]
    fn test_intensity_component() {
        let result = greyscale(&single(Pixel::new(100, 150, 200)), GreyscaleComponent::Intensity);
        assert_eq!(result.pixel(0, 0), Pixel::grey(150));
    }

    #[test]
    fn test_channel_components() {
        let img = single(Pixel::new(10, 20, 30));
        assert_eq!(greyscale(&img, GreyscaleComponent::Red).pixel(0, 0), Pixel::new(10, 0, 0));
        assert_eq!(greyscale(&img, GreyscaleComponent::Green).pixel(0, 0), Pixel::new(0, 20, 0));
        assert_eq!(greyscale(&img, GreyscaleComponent::Blue).pixel(0, 0), Pixel::new(0, 0, 30));
    }

    #[test]
    fn test_luma_white_truncates() {
        // Coefficients sum to 1.0 but the float sum lands just below 255
        let result = greyscale(&single(Pixel::grey(255)), GreyscaleComponent::Luma);
        assert_eq!(result.pixel(0, 0), Pixel::grey(254));
    }

    #[test]
    fn test_parse_names() {
        for component in GreyscaleComponent::ALL {
            assert_eq!(component.name().parse::<GreyscaleComponent>().unwrap(), component);
        }
        assert_eq!(
            "alpha-component".parse::<GreyscaleComponent>(),
            Err(ImageError::UnknownComponent("alpha-component".to_string()))
        );
        assert!(GreyscaleFilter::from_name("").is_err());
    }

    #[test]
    fn test_preserves_dimensions() {
        let img = Image::from_fn(7, 3, |x, y| Pixel::new(x as u8, y as u8, 0));
        for component in GreyscaleComponent::ALL {
            assert_eq!(greyscale(&img, component).size(), (7, 3));
        }
    }
}

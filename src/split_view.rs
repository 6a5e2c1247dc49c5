//! Split-view preview: apply an operation to the left part of an image only.
//!
//! The left `floor(percentage / 100 * width)` columns are cropped, processed
//! on their own, and stitched back onto an untouched copy of the source.
//! Operations that look at their whole input (blur edges, color-correction
//! peaks) therefore only see the crop.
//!
//! Operations are named as text:
//!
//! ```text
//! blur | sharpen | sepia | color-correct
//! red-component | green-component | blue-component
//! value-component | luma-component | intensity-component
//! levels-adjust <black> <mid> <white>
//! ```
//!
//! Names are case-insensitive and parameters are separated by whitespace.

use std::fmt;
use std::str::FromStr;

use ndarray::s;

use crate::error::ImageError;
use crate::filters::color_transform::ColorTransformFilter;
use crate::filters::grayscale::{greyscale, GreyscaleComponent};
use crate::filters::kernel::KernelFilter;
use crate::filters::levels::Levels;
use crate::filters::ImageFilter;
use crate::histogram;
use crate::image::Image;

/// An operation that can be previewed in a split view.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// 3x3 blur.
    Blur,
    /// 5x5 sharpen.
    Sharpen,
    /// Sepia tone.
    Sepia,
    /// One of the greyscale projections.
    Greyscale(GreyscaleComponent),
    /// Histogram peak alignment.
    ColorCorrect,
    /// Quadratic tone curve.
    Levels(Levels),
}

impl Operation {
    /// Run the operation on the whole of `image`.
    pub fn apply(&self, image: &Image) -> Image {
        match self {
            Self::Blur => KernelFilter::blur().apply(image),
            Self::Sharpen => KernelFilter::sharpen().apply(image),
            Self::Sepia => ColorTransformFilter::sepia().apply(image),
            Self::Greyscale(component) => greyscale(image, *component),
            Self::ColorCorrect => histogram::color_correct(image),
            Self::Levels(levels) => levels.apply(image),
        }
    }
}

fn parse_level(arg: &str) -> Result<i32, ImageError> {
    arg.parse()
        .map_err(|_| ImageError::InvalidOperationArgs(format!("not an integer: {arg}")))
}

impl FromStr for Operation {
    type Err = ImageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let name = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let operation = match name.as_str() {
            "blur" => Self::Blur,
            "sharpen" => Self::Sharpen,
            "sepia" => Self::Sepia,
            "color-correct" => Self::ColorCorrect,
            "levels-adjust" => {
                let [black, mid, white] = args.as_slice() else {
                    return Err(ImageError::InvalidOperationArgs(format!(
                        "levels-adjust expects 3 parameters, got {}",
                        args.len()
                    )));
                };
                return Ok(Self::Levels(Levels::new(
                    parse_level(black)?,
                    parse_level(mid)?,
                    parse_level(white)?,
                )?));
            }
            other => match other.parse::<GreyscaleComponent>() {
                Ok(component) => Self::Greyscale(component),
                Err(_) => return Err(ImageError::UnsupportedOperation(s.trim().to_string())),
            },
        };

        if !args.is_empty() {
            return Err(ImageError::InvalidOperationArgs(format!(
                "{name} takes no parameters"
            )));
        }
        Ok(operation)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Blur => f.write_str("blur"),
            Self::Sharpen => f.write_str("sharpen"),
            Self::Sepia => f.write_str("sepia"),
            Self::Greyscale(component) => write!(f, "{component}"),
            Self::ColorCorrect => f.write_str("color-correct"),
            Self::Levels(levels) => {
                let (black, mid, white) = levels.points();
                write!(f, "levels-adjust {black} {mid} {white}")
            }
        }
    }
}

/// Number of columns processed for `width_percentage` of `width`.
fn split_width(width: usize, width_percentage: f64) -> usize {
    ((width_percentage / 100.0 * width as f64).floor() as usize).min(width)
}

/// Apply `operation` to the left `width_percentage` percent of `image`.
///
/// # Arguments
/// * `operation` - Operation to preview
/// * `image` - Source image
/// * `width_percentage` - Share of the width to process, 0 to 100
///
/// # Returns
/// An image of the source dimensions: processed columns on the left, source
/// columns on the right
///
/// # Errors
/// Returns [`ImageError::InvalidPercentage`] if `width_percentage` is NaN or
/// outside 0 to 100.
pub fn split_view(
    operation: &Operation,
    image: &Image,
    width_percentage: f64,
) -> Result<Image, ImageError> {
    if !(0.0..=100.0).contains(&width_percentage) {
        return Err(ImageError::InvalidPercentage(width_percentage));
    }

    let split = split_width(image.width(), width_percentage);
    log::debug!(
        "split view: {operation} on {split} of {} columns",
        image.width()
    );

    let processed = operation.apply(&image.crop_left(split));
    let mut output = image.as_array().to_owned();
    output
        .slice_mut(s![.., ..split, ..])
        .assign(&processed.as_array());

    Ok(Image::from_array_unchecked(output))
}

/// Parse `operation` and apply it in a split view.
///
/// # Errors
/// Fails with the parse error of [`Operation::from_str`] or the errors of
/// [`split_view`].
pub fn split_view_named(
    operation: &str,
    image: &Image,
    width_percentage: f64,
) -> Result<Image, ImageError> {
    split_view(&operation.parse()?, image, width_percentage)
}

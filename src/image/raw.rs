//! Line-oriented transport form shared with codecs and image stores.
//!
//! Layout:
//! - line 0: width (decimal)
//! - line 1: height (decimal)
//! - lines 2..2+height: one row each, every pixel written as three
//!   zero-padded 3-digit channels, e.g. `(7, 255, 10)` -> `"007255010"`

use super::{checked_buffer_len, Image, Pixel};
use crate::error::ImageError;

/// Characters used by one encoded pixel.
const PIXEL_WIDTH: usize = 9;

fn parse_dimension(line: Option<&str>, name: &str) -> Result<usize, ImageError> {
    let line = line.ok_or_else(|| ImageError::InvalidRawImage(format!("missing {name}")))?;
    line.trim()
        .parse::<usize>()
        .map_err(|_| ImageError::InvalidRawImage(format!("bad {name}: {line:?}")))
}

fn parse_channel(field: &str, x: usize, y: usize) -> Result<u8, ImageError> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ImageError::InvalidRawImage(format!(
            "non-digit channel {field:?} at ({x}, {y})"
        )));
    }
    field
        .parse::<u8>()
        .map_err(|_| ImageError::InvalidRawImage(format!("channel {field} out of range at ({x}, {y})")))
}

impl Image {
    /// Decode an image from its transport form.
    ///
    /// Every row is length-checked before any pixel storage is reserved, so
    /// the allocation is bounded by the size of `lines`.
    ///
    /// # Errors
    /// Returns [`ImageError::InvalidRawImage`] when the header is missing or
    /// too large, the row count or a row length is wrong, or a channel is not
    /// a 3-digit value in 0..=255.
    pub fn from_raw_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self, ImageError> {
        let mut iter = lines.iter().map(AsRef::as_ref);
        let width = parse_dimension(iter.next(), "width")?;
        let height = parse_dimension(iter.next(), "height")?;

        let too_large = || ImageError::InvalidRawImage(format!("{width}x{height} is too large"));
        checked_buffer_len(width, height).map_err(|_| too_large())?;
        let row_len = width.checked_mul(PIXEL_WIDTH).ok_or_else(too_large)?;

        let rows: Vec<&str> = iter.collect();
        if rows.len() != height {
            return Err(ImageError::InvalidRawImage(format!(
                "expected {height} rows, got {}",
                rows.len()
            )));
        }
        if let Some((y, line)) = rows
            .iter()
            .enumerate()
            .find(|(_, line)| !line.is_ascii() || line.len() != row_len)
        {
            return Err(ImageError::InvalidRawImage(format!(
                "row {y} has length {}, expected {row_len}",
                line.len()
            )));
        }

        let mut pixels = Vec::with_capacity(width * height);
        for (y, line) in rows.iter().enumerate() {
            for x in 0..width {
                let start = x * PIXEL_WIDTH;
                let red = parse_channel(&line[start..start + 3], x, y)?;
                let green = parse_channel(&line[start + 3..start + 6], x, y)?;
                let blue = parse_channel(&line[start + 6..start + 9], x, y)?;
                pixels.push(Pixel::new(red, green, blue));
            }
        }

        Image::new(width, height, pixels)
    }

    /// Encode the image into its transport form.
    pub fn to_raw_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.height() + 2);
        lines.push(self.width().to_string());
        lines.push(self.height().to_string());
        for y in 0..self.height() {
            let mut line = String::with_capacity(self.width() * PIXEL_WIDTH);
            for x in 0..self.width() {
                let p = self.pixel(x, y);
                line.push_str(&format!("{:03}{:03}{:03}", p.red, p.green, p.blue));
            }
            lines.push(line);
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_pixel_padding() {
        let img = Image::new(1, 1, vec![Pixel::new(7, 255, 10)]).unwrap();
        assert_eq!(img.to_raw_lines(), vec!["1", "1", "007255010"]);
    }

    #[test]
    fn test_decode_encode_identity() {
        let lines = ["2", "2", "000001002255254253", "010020030100200250"];
        let img = Image::from_raw_lines(&lines).unwrap();
        assert_eq!(img.size(), (2, 2));
        assert_eq!(img.pixel(1, 0), Pixel::new(255, 254, 253));
        assert_eq!(img.pixel(0, 1), Pixel::new(10, 20, 30));
        assert_eq!(img.to_raw_lines(), lines);
    }

    #[test]
    fn test_decode_rejects_short_row() {
        let lines = ["2", "1", "000001002"];
        assert!(matches!(
            Image::from_raw_lines(&lines),
            Err(ImageError::InvalidRawImage(_))
        ));
    }

    #[test]
    fn test_decode_rejects_missing_rows() {
        let lines = ["1", "2", "000001002"];
        assert!(Image::from_raw_lines(&lines).is_err());
        let empty: [&str; 0] = [];
        assert!(Image::from_raw_lines(&empty).is_err());
    }

    #[test]
    fn test_decode_rejects_out_of_range_channel() {
        assert!(Image::from_raw_lines(&["1", "1", "256000000"]).is_err());
        assert!(Image::from_raw_lines(&["1", "1", "-01000000"]).is_err());
    }

    #[test]
    fn test_decode_rejects_oversized_header() {
        let cases: [&[&str]; 4] = [
            &["18446744073709551615", "1", "000000000"],
            &["4611686018427387904", "4", "", "", "", ""],
            &["1", "18446744073709551615", "000000000"],
            &["1099511627776", "1", "000000000"],
        ];
        for lines in cases {
            assert!(
                matches!(Image::from_raw_lines(lines), Err(ImageError::InvalidRawImage(_))),
                "{lines:?}"
            );
        }
    }

    #[test]
    fn test_decode_wide_empty_image() {
        let img = Image::from_raw_lines(&["1000000", "0"]).unwrap();
        assert_eq!(img.size(), (1_000_000, 0));
    }

    #[test]
    fn test_empty_image_round_trip() {
        let img = Image::from_raw_lines(&["0", "0"]).unwrap();
        assert!(img.is_empty());
        assert_eq!(img.to_raw_lines(), vec!["0", "0"]);
    }
}

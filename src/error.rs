/// An error type for the pixel-grid operations.
///
/// Every variant is raised before any pixel is processed, so a failed call
/// never yields a partially transformed image.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ImageError {
    /// Kernel is not square or has an even side length.
    #[error("Invalid kernel of {rows}x{cols}: must be square with an odd side length")]
    InvalidKernel {
        /// Number of kernel rows.
        rows: usize,
        /// Length of the first offending row.
        cols: usize,
    },

    /// Greyscale component name is not one of the six supported projections.
    #[error("Invalid component type for creating a greyscale image: {0}")]
    UnknownComponent(String),

    /// Split-view operation name is not supported.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Operation parameters could not be parsed.
    #[error("Invalid arguments for operation: {0}")]
    InvalidOperationArgs(String),

    /// Percentage outside of 0..=100.
    #[error("Percentage must be within 0 and 100, got {0}")]
    InvalidPercentage(f64),

    /// Black, mid and white points violate `0 <= b < m < w <= 255`.
    #[error("Invalid levels b={black} m={mid} w={white}: expected 0 <= b < m < w <= 255")]
    InvalidLevels {
        /// Black point.
        black: i32,
        /// Mid point.
        mid: i32,
        /// White point.
        white: i32,
    },

    /// Images that must share a size do not.
    #[error("Dimension mismatch: expected {expected:?}, got {actual:?}")]
    DimensionMismatch {
        /// Expected (width, height).
        expected: (usize, usize),
        /// Actual (width, height).
        actual: (usize, usize),
    },

    /// Pixel buffer length does not match width * height.
    #[error("Data length ({0}) does not match the image size ({1})")]
    InvalidBufferLength(usize, usize),

    /// Width times height times channels does not fit in `usize`.
    #[error("Image of {width}x{height} is too large to address")]
    ImageTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
    },

    /// Array does not carry exactly three color channels.
    #[error("Expected 3 color channels, got {0}")]
    InvalidChannelCount(usize),

    /// Transport form could not be decoded.
    #[error("Invalid raw image data: {0}")]
    InvalidRawImage(String),
}

//! Error types shared by every stage of the slicer

use crate::models::Rectangle;
use thiserror::Error;

/// Top-level error type for all slicer operations
#[derive(Debug, Error)]
pub enum SlicerError {
    // -- Codec boundary --
    /// The image stream could not be decoded
    #[error("image decode failed: {0}")]
    Decode(String),

    /// The file extension or requested format is not handled
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The decoded image is not 8-bit grayscale
    #[error("unsupported color type {0}, expected 8-bit grayscale")]
    UnsupportedColor(String),

    /// The image could not be encoded
    #[error("image encode failed: {0}")]
    Encode(String),

    // -- Geometry --
    /// A rectangle is not fully contained in the buffer it addresses
    #[error("region {rect} is outside a {width}x{height} buffer")]
    InvalidRegion {
        /// Requested region
        rect: Rectangle,
        /// Buffer width
        width: usize,
        /// Buffer height
        height: usize,
    },

    /// A pixel coordinate is outside the buffer
    #[error("pixel ({x}, {y}) is outside a {width}x{height} buffer")]
    OutOfRange {
        /// Requested column
        x: usize,
        /// Requested row
        y: usize,
        /// Buffer width
        width: usize,
        /// Buffer height
        height: usize,
    },

    /// The input or configuration cannot be processed
    #[error("invalid input: {0}")]
    InvalidInput(String),

    // -- Filesystem --
    /// Reading or writing a file failed
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Alias used throughout the crate
pub type Result<T> = std::result::Result<T, SlicerError>;

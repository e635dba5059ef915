//! fp_slicer - fingerprint card slicer
//!
//! Locates the individual prints on a scanned ten-print card and returns one
//! bounding rectangle per print, in the coordinates of the scanned image.
//! The core works on in-memory grayscale buffers; decoding, encoding and
//! batch processing live in [`tools`].

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Error type shared by every stage
pub mod error;
/// Guide-line removal filters and the card filter pipeline
pub mod filters;
/// Core data structures (PixelBuffer, Rectangle)
pub mod models;
/// Card segmentation (margin trim, print search, diagnostics)
pub mod slicer;
/// Codec and batch helpers for the CLI, benches and tests
pub mod tools;
/// Pixel-level primitives (binarization, scaling, projection profiles)
pub mod utils;

pub use error::{Result, SlicerError};
pub use filters::{Filter, FilterPipeline};
pub use models::{ColorMode, PixelBuffer, Rectangle};
pub use slicer::{DebugSink, LayoutMode, Slicer, SlicerConfig, Stage};

/// Slice a grayscale card with the default configuration
///
/// # Arguments
/// * `image` - Full-resolution grayscale card
///
/// # Returns
/// One rectangle per print found, top row first, each row left to right
pub fn slice(image: &PixelBuffer) -> Result<Vec<Rectangle>> {
    Slicer::default().calculate_slice(image)
}

//! Guide-line removal filters
//!
//! Stateless operators over a binary [`PixelBuffer`], composed into a
//! [`FilterPipeline`]. Each one rewrites the whole buffer in place:
//! - Majority smoothing (speck and thin-stroke cleanup)
//! - Vertical / horizontal rule stripping
//! - Black bar consolidation
//! - Edge banding (frame and scanner artifacts)

/// Outer border painting
pub mod edge;
/// Ruled-line and bar strippers
pub mod lines;
/// Majority smoothing
pub mod smoothing;

use crate::models::PixelBuffer;
use tracing::trace;

/// Color an [`Filter::EdgeBand`] paints with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BandColor {
    /// The buffer's white value
    White,
    /// Ink
    Black,
}

/// A single denoising operator and its window parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// Majority smoothing over a `bw x bh` window
    BlockMajority {
        /// Window width
        bw: usize,
        /// Window height
        bh: usize,
    },
    /// Whiten windows whose left and right columns are blank
    StripVerticalRun {
        /// Window width
        bw: usize,
        /// Window height
        bh: usize,
    },
    /// Whiten windows whose top and bottom rows are blank
    StripHorizontalWhiteRun {
        /// Window width
        bw: usize,
        /// Window height
        bh: usize,
    },
    /// Blacken windows whose top and bottom rows are solid ink
    StripHorizontalBlackRun {
        /// Window width
        bw: usize,
        /// Window height
        bh: usize,
    },
    /// Paint the outer `size` pixels
    EdgeBand {
        /// Band thickness
        size: usize,
        /// Paint color
        color: BandColor,
    },
}

impl Filter {
    /// Apply this operator to `buffer`
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        match *self {
            Filter::BlockMajority { bw, bh } => smoothing::block_majority(buffer, bw, bh),
            Filter::StripVerticalRun { bw, bh } => lines::strip_vertical_run(buffer, bw, bh),
            Filter::StripHorizontalWhiteRun { bw, bh } => {
                lines::strip_horizontal_white_run(buffer, bw, bh)
            }
            Filter::StripHorizontalBlackRun { bw, bh } => {
                lines::strip_horizontal_black_run(buffer, bw, bh)
            }
            Filter::EdgeBand { size, color } => {
                let value = match color {
                    BandColor::White => buffer.white(),
                    BandColor::Black => buffer.black(),
                };
                edge::edge_band(buffer, size, value)
            }
        }
    }
}

/// Guide-line geometry of the ten-print card, tuned empirically
///
/// Changing any step changes the slicer output.
pub const CARD_FILTERS: [Filter; 10] = [
    Filter::BlockMajority { bw: 5, bh: 5 },
    Filter::BlockMajority { bw: 5, bh: 9 },
    Filter::StripVerticalRun { bw: 3, bh: 7 },
    Filter::StripVerticalRun { bw: 7, bh: 7 },
    Filter::StripHorizontalWhiteRun { bw: 7, bh: 11 },
    Filter::StripVerticalRun { bw: 11, bh: 7 },
    Filter::StripVerticalRun { bw: 15, bh: 7 },
    Filter::EdgeBand {
        size: 5,
        color: BandColor::White,
    },
    Filter::StripHorizontalBlackRun { bw: 5, bh: 21 },
    Filter::EdgeBand {
        size: 5,
        color: BandColor::White,
    },
];

/// Ordered sequence of filters applied once to a buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPipeline {
    steps: Vec<Filter>,
}

impl FilterPipeline {
    /// The fixed ten-print card sequence
    pub fn card() -> Self {
        Self {
            steps: CARD_FILTERS.to_vec(),
        }
    }

    /// Steps in application order
    pub fn steps(&self) -> &[Filter] {
        &self.steps
    }

    /// Run every step, in order, over `buffer`
    pub fn apply(&self, buffer: &mut PixelBuffer) {
        for step in &self.steps {
            trace!(?step, "applying filter");
            step.apply(buffer);
        }
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::card()
    }
}

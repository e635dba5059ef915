//! Projection profiles
//!
//! A profile collapses a 2D buffer into one aggregate per column or row. They
//! are recomputed on demand; a profile is only valid for the buffer contents
//! at the time it was built.

use crate::models::PixelBuffer;

/// What a profile accumulates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weight {
    /// Raw pixel values (paper-weighted)
    Raw,
    /// `white - value` (ink-weighted)
    Ink,
}

/// One entry per column, summed down the full height
pub fn column_profile(buffer: &PixelBuffer, weight: Weight) -> Vec<u32> {
    let mut profile = vec![0u32; buffer.width()];
    let white = buffer.white() as u32;
    for y in 0..buffer.height() {
        for (entry, &v) in profile.iter_mut().zip(buffer.row(y)) {
            *entry += match weight {
                Weight::Raw => v as u32,
                Weight::Ink => white - v as u32,
            };
        }
    }
    profile
}

/// One entry per row, summed over columns `[left, right)` only
///
/// The column range is clamped to the buffer.
pub fn row_profile_within(
    buffer: &PixelBuffer,
    weight: Weight,
    left: usize,
    right: usize,
) -> Vec<u32> {
    let right = right.min(buffer.width());
    let left = left.min(right);
    let white = buffer.white() as u32;

    (0..buffer.height())
        .map(|y| {
            buffer.row(y)[left..right]
                .iter()
                .map(|&v| match weight {
                    Weight::Raw => v as u32,
                    Weight::Ink => white - v as u32,
                })
                .sum()
        })
        .collect()
}

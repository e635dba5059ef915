use crate::error::{Result, SlicerError};
use crate::models::{PixelBuffer, Rectangle};
use crate::utils::profile::Weight;
use tracing::debug;

/// Lines skipped at every edge before the margin scan starts
pub const MARGIN_PADDING: usize = 10;
/// Fraction of a line that must match for the margin to advance over it
pub const MARGIN_THRESHOLD: f32 = 0.8;

/// Locate the card content by scanning inward from each edge
///
/// Two passes run over the binarized card. The paper pass advances over
/// lines that are mostly white; the ink pass then starts again from the
/// padding and advances over lines that are mostly ink (a solid frame or
/// border bar). The ink pass decides the returned rectangle, so a blank
/// margin alone never trims into the card; the paper pass is only reported
/// for diagnostics.
///
/// Fails with `InvalidInput` when the buffer is not larger than twice the
/// padding or the scans cross each other.
pub fn margin_trim(buffer: &PixelBuffer, threshold: f32, padding: usize) -> Result<Rectangle> {
    if buffer.width() <= 2 * padding || buffer.height() <= 2 * padding {
        return Err(SlicerError::InvalidInput(format!(
            "{}x{} card is too small for a margin padding of {}",
            buffer.width(),
            buffer.height(),
            padding
        )));
    }

    let paper = scan_edges(buffer, threshold, padding, Weight::Raw);
    let ink = scan_edges(buffer, threshold, padding, Weight::Ink);
    debug!(%paper, %ink, "margin scan");

    if ink.is_empty() {
        return Err(SlicerError::InvalidInput(format!(
            "margin trim collapsed to {}",
            ink
        )));
    }
    Ok(ink)
}

/// One four-sided scan against `weight`
///
/// Leading edges land on the last qualifying line; trailing edges land on the
/// first line of the trailing qualifying run, which the exclusive bound drops.
pub fn scan_edges(buffer: &PixelBuffer, threshold: f32, padding: usize, weight: Weight) -> Rectangle {
    let (width, height) = (buffer.width(), buffer.height());

    let column = |x: usize| fraction(column_sum(buffer, x, weight), buffer.white(), height) > threshold;
    let row = |y: usize| fraction(row_sum(buffer, y, weight), buffer.white(), width) > threshold;

    Rectangle::new(
        advance(padding, width, column) as i32,
        retreat(width.saturating_sub(padding), width, column) as i32,
        advance(padding, height, row) as i32,
        retreat(height.saturating_sub(padding), height, row) as i32,
    )
}

fn advance(start: usize, len: usize, qualifies: impl Fn(usize) -> bool) -> usize {
    let mut edge = start;
    for i in start..len {
        if !qualifies(i) {
            break;
        }
        edge = i;
    }
    edge
}

fn retreat(start: usize, len: usize, qualifies: impl Fn(usize) -> bool) -> usize {
    let mut edge = start;
    for i in (0..=start).rev() {
        if i >= len || !qualifies(i) {
            break;
        }
        edge = i;
    }
    edge
}

fn column_sum(buffer: &PixelBuffer, x: usize, weight: Weight) -> u32 {
    match weight {
        Weight::Raw => buffer.sum_column(x),
        Weight::Ink => buffer.sum_ink_column(x),
    }
}

fn row_sum(buffer: &PixelBuffer, y: usize, weight: Weight) -> u32 {
    match weight {
        Weight::Raw => buffer.sum_row(y),
        Weight::Ink => buffer.sum_ink_row(y),
    }
}

fn fraction(sum: u32, white: u8, len: usize) -> f32 {
    if len == 0 {
        return 0.0;
    }
    sum as f32 / (white as f32 * len as f32)
}

//! Per-row fingerprint search over a filtered half card
//!
//! Works entirely on projection profiles: the column ink profile locates each
//! print horizontally, then a row ink profile restricted to those columns
//! locates it vertically.

use crate::models::{PixelBuffer, Rectangle};
use crate::utils::profile::{Weight, column_profile, row_profile_within};
use tracing::{debug, trace};

/// Column ink needed to start a peak
pub const PEAK_START_LEVEL: u32 = 20;
/// Ink below which a column or row counts as a gap between prints
pub const EDGE_LEVEL: u32 = 10;
/// Narrower peaks are noise
pub const MINIMUM_WIDTH: i32 = 25;
/// Wider peaks are two fused prints; also the length of the peak window
pub const MAXIMUM_SIZE_WIDTH: i32 = 100;
/// Offset from the left edge where the fused-print waist search begins
pub const MERGE_SEARCH_OFFSET: i32 = 30;
/// Start of the row band searched for the vertical peak, as a fraction of height
pub const LIMIT_SEARCH_INIT: f32 = 0.3;
/// End of the row band searched for the vertical peak, as a fraction of height
pub const LIMIT_SEARCH_FIN: f32 = 0.7;

/// Find up to `count` prints, left to right
///
/// Returns fewer rectangles when the profile runs out of peaks.
pub fn search_fingerprints(half: &PixelBuffer, count: usize) -> Vec<Rectangle> {
    let profile = column_profile(half, Weight::Ink);
    let mut working = profile.clone();
    let mut last = 0usize;
    let mut found = Vec::with_capacity(count);

    for _ in 0..count {
        let Some(rect) = search_fingerprint(half, last, &profile, &working) else {
            debug!(found = found.len(), count, "column profile exhausted");
            break;
        };

        // Claim everything up to the right edge so later peaks start past it
        let claimed = (rect.right as usize).min(working.len().saturating_sub(1));
        working[..=claimed].fill(0);
        last = rect.right as usize;
        found.push(rect);
    }

    found
}

/// Locate the next print at or after column `last`
///
/// `profile` is the untouched column ink profile; `working` is the same
/// profile with already-claimed columns zeroed. Peaks narrower than
/// [`MINIMUM_WIDTH`], or with no ink in the middle row band, are skipped and
/// the scan resumes one column past them. Every retry advances the cursor, so
/// the loop is bounded by the profile length.
pub fn search_fingerprint(
    half: &PixelBuffer,
    last: usize,
    profile: &[u32],
    working: &[u32],
) -> Option<Rectangle> {
    let width = profile.len();
    let mut cursor = last;

    for _ in 0..=width {
        let peak = find_peak(working, cursor)?;
        let (left, mut right) = horizontal_bounds(profile, peak, cursor);

        if right - left < MINIMUM_WIDTH {
            trace!(peak, left, right, "peak too narrow");
            cursor = peak + 1;
            continue;
        }

        if right - left > MAXIMUM_SIZE_WIDTH {
            let waist = narrowest_column(profile, left);
            debug!(left, right, waist, "splitting fused prints");
            right = waist;
        }

        let Some((top, bottom)) = vertical_bounds(half, left, right) else {
            trace!(peak, left, right, "no ink in the middle band");
            cursor = peak + 1;
            continue;
        };

        return Some(Rectangle::new(left, right, top, bottom));
    }

    None
}

/// Column of the strongest peak in the window that opens at the first column
/// above [`PEAK_START_LEVEL`]
///
/// The window spans [`MAXIMUM_SIZE_WIDTH`] columns and closes early when the
/// profile drops to zero.
fn find_peak(working: &[u32], from: usize) -> Option<usize> {
    let start = (from..working.len()).find(|&k| working[k] > PEAK_START_LEVEL)?;
    let end = (start + MAXIMUM_SIZE_WIDTH as usize).min(working.len());

    let mut peak = start;
    for k in start + 1..end {
        if working[k] == 0 {
            break;
        }
        if working[k] > working[peak] {
            peak = k;
        }
    }
    Some(peak)
}

/// Walk outward from `peak` while the profile stays at or above [`EDGE_LEVEL`]
///
/// Each edge lands one column beyond the first gap column, clamped to the
/// profile. The left walk never goes below `floor`.
fn horizontal_bounds(profile: &[u32], peak: usize, floor: usize) -> (i32, i32) {
    let left = (floor..=peak)
        .rev()
        .find(|&k| profile[k] < EDGE_LEVEL)
        .map_or(floor as i32 - 1, |k| k as i32 - 1)
        .max(0);
    let right = (peak..profile.len())
        .find(|&k| profile[k] < EDGE_LEVEL)
        .map_or(profile.len() as i32, |k| k as i32 + 1)
        .min(profile.len() as i32);
    (left, right)
}

/// Column of least ink in `[left + 30, left + 100)`
fn narrowest_column(profile: &[u32], left: i32) -> i32 {
    let from = (left + MERGE_SEARCH_OFFSET) as usize;
    let to = ((left + MAXIMUM_SIZE_WIDTH) as usize).min(profile.len());

    let mut best = from;
    for k in from..to {
        if profile[k] < profile[best] {
            best = k;
        }
    }
    best as i32
}

/// Top and bottom of the print spanning columns `[left, right)`
///
/// The anchor row is the ink maximum inside the middle band
/// `[30%, 70%)` of the height; returns `None` when that band holds no ink.
fn vertical_bounds(half: &PixelBuffer, left: i32, right: i32) -> Option<(i32, i32)> {
    let rows = row_profile_within(half, Weight::Ink, left as usize, right as usize);
    let height = rows.len();
    let init = (height as f32 * LIMIT_SEARCH_INIT) as usize;
    let fin = (height as f32 * LIMIT_SEARCH_FIN) as usize;

    let mut anchor = None;
    let mut best = 0u32;
    for y in init..fin.min(height) {
        if rows[y] > best {
            best = rows[y];
            anchor = Some(y);
        }
    }
    let anchor = anchor?;

    let top = (0..=anchor)
        .rev()
        .find(|&k| rows[k] < EDGE_LEVEL)
        .map_or(-1, |k| k as i32 - 1)
        .max(0);
    let bottom = (anchor..height)
        .find(|&k| rows[k] < EDGE_LEVEL)
        .map_or(height as i32, |k| k as i32 + 1)
        .min(height as i32);
    Some((top, bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorMode, WHITE_BINARY};

    fn half_with_blobs(width: usize, height: usize, blobs: &[Rectangle]) -> PixelBuffer {
        let mut buffer = PixelBuffer::filled(width, height, ColorMode::Binary, WHITE_BINARY);
        for blob in blobs {
            for y in blob.top..blob.bottom {
                for x in blob.left..blob.right {
                    buffer.set_pixel(x as usize, y as usize, 0).unwrap();
                }
            }
        }
        buffer
    }

    #[test]
    fn test_find_peak_tracks_maximum_in_window() {
        let working = vec![0, 5, 25, 40, 90, 60, 0, 200];
        assert_eq!(find_peak(&working, 0), Some(4));
        assert_eq!(find_peak(&working, 5), Some(5));
        assert_eq!(find_peak(&[1, 2, 20], 0), None);
    }

    #[test]
    fn test_horizontal_bounds_step_past_gap() {
        let profile = vec![0, 0, 30, 30, 30, 30, 0, 0];
        assert_eq!(horizontal_bounds(&profile, 3, 0), (0, 7));
        let profile = vec![0, 0, 0, 30, 30, 30, 0, 0];
        assert_eq!(horizontal_bounds(&profile, 4, 0), (1, 7));
        let profile = vec![30, 30, 30];
        assert_eq!(horizontal_bounds(&profile, 1, 0), (0, 3));
    }

    #[test]
    fn test_finds_separated_blobs_in_order() {
        let blobs = [
            Rectangle::new(20, 60, 15, 55),
            Rectangle::new(90, 130, 12, 58),
            Rectangle::new(160, 200, 18, 52),
        ];
        let half = half_with_blobs(230, 70, &blobs);

        let found = search_fingerprints(&half, 3);

        assert_eq!(found.len(), 3);
        for (rect, blob) in found.iter().zip(&blobs) {
            assert!(rect.contains_rect(blob), "{} should contain {}", rect, blob);
        }
        for pair in found.windows(2) {
            assert!(!pair[0].intersects(&pair[1]));
        }
        assert_eq!(found[0], Rectangle::new(18, 61, 13, 56));
    }

    #[test]
    fn test_short_result_when_profile_exhausted() {
        let half = half_with_blobs(200, 70, &[Rectangle::new(30, 70, 15, 55)]);
        let found = search_fingerprints(&half, 5);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_narrow_stroke_is_skipped() {
        // A 10px stroke ahead of a real print
        let half = half_with_blobs(
            200,
            70,
            &[Rectangle::new(10, 20, 5, 65), Rectangle::new(60, 100, 15, 55)],
        );

        let found = search_fingerprints(&half, 1);

        assert_eq!(found.len(), 1);
        assert!(found[0].contains_rect(&Rectangle::new(60, 100, 15, 55)));
        assert!(found[0].left > 20);
    }

    #[test]
    fn test_fused_prints_split_at_waist() {
        // Two 50px prints joined by a 6px bridge carrying enough ink to fuse them
        let half = half_with_blobs(
            200,
            80,
            &[
                Rectangle::new(20, 70, 15, 65),
                Rectangle::new(70, 76, 30, 50),
                Rectangle::new(76, 126, 15, 65),
            ],
        );

        let found = search_fingerprints(&half, 2);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].right, 70, "{}", found[0]);
        assert!(found[0].contains_rect(&Rectangle::new(20, 70, 15, 65)));
        assert!(found[1].contains_rect(&Rectangle::new(76, 126, 15, 65)));
    }

    #[test]
    fn test_ink_outside_middle_band_is_skipped() {
        // Blob confined to the rows above the 30% line
        let half = half_with_blobs(200, 100, &[Rectangle::new(30, 80, 2, 28)]);
        assert!(search_fingerprints(&half, 1).is_empty());
    }
}

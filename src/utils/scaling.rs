//! Block-average resampling
//!
//! The only resampling primitive in the crate. Every destination pixel is the
//! truncated mean of a non-overlapping `k x k` source block; no interpolation.

use crate::error::{Result, SlicerError};
use crate::models::PixelBuffer;

/// Side of the square source block averaged into one pixel for `factor`
pub fn block_size(factor: f32) -> Result<usize> {
    if !(factor > 0.0 && factor <= 1.0) {
        return Err(SlicerError::InvalidInput(format!(
            "scale factor {} is outside (0, 1]",
            factor
        )));
    }
    Ok((1.0 / factor).round().max(1.0) as usize)
}

/// Downscale `source` by `factor`
///
/// Destination size is `width / k x height / k` with `k = round(1 / factor)`,
/// which equals `round(width * factor)` whenever the source is a multiple of
/// `k`. Trailing partial blocks are dropped. Fails with `InvalidInput` when a
/// single block does not fit in the source.
pub fn average_block_downscale(source: &PixelBuffer, factor: f32) -> Result<PixelBuffer> {
    let k = block_size(factor)?;
    if k > source.width() || k > source.height() {
        return Err(SlicerError::InvalidInput(format!(
            "scale factor {} needs {}x{} blocks, larger than the {}x{} source",
            factor,
            k,
            k,
            source.width(),
            source.height()
        )));
    }
    let dst_width = source.width() / k;
    let dst_height = source.height() / k;
    let area = (k as u64) * (k as u64);

    let mut data = Vec::with_capacity(dst_width * dst_height);
    for by in 0..dst_height {
        for bx in 0..dst_width {
            let mut sum = 0u64;
            for y in by * k..(by + 1) * k {
                sum += source.row(y)[bx * k..(bx + 1) * k]
                    .iter()
                    .map(|&v| v as u64)
                    .sum::<u64>();
            }
            data.push((sum / area) as u8);
        }
    }

    PixelBuffer::from_raw(data, dst_width, dst_height, source.mode())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorMode;

    #[test]
    fn test_block_average_truncates() {
        // One 2x2 block: (10 + 11 + 12 + 14) / 4 = 11.75 -> 11
        let source =
            PixelBuffer::from_raw(vec![10, 11, 12, 14], 2, 2, ColorMode::Grayscale).unwrap();
        let scaled = source.scale(0.5).unwrap();
        assert_eq!(scaled.width(), 1);
        assert_eq!(scaled.height(), 1);
        assert_eq!(scaled.as_bytes(), &[11]);
    }

    #[test]
    fn test_eighth_scale_dimensions() {
        let source = PixelBuffer::filled(800, 480, ColorMode::Grayscale, 90);
        let scaled = source.scale(1.0 / 8.0).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (100, 60));
        assert!(scaled.as_bytes().iter().all(|&v| v == 90));
        // Source untouched
        assert_eq!(source.width(), 800);
    }

    #[test]
    fn test_partial_blocks_dropped() {
        let source = PixelBuffer::filled(21, 10, ColorMode::Grayscale, 1);
        let scaled = source.scale(0.25).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (5, 2));
    }

    #[test]
    fn test_composition_matches_direct_scale() {
        let data = (0..64 * 48).map(|i| (i * 7 % 256) as u8).collect();
        let source = PixelBuffer::from_raw(data, 64, 48, ColorMode::Grayscale).unwrap();

        let composed = source.scale(0.5).unwrap().scale(0.25).unwrap();
        let direct = source.scale(0.125).unwrap();

        assert!(composed.width().abs_diff(direct.width()) <= 1);
        assert!(composed.height().abs_diff(direct.height()) <= 1);
    }

    #[test]
    fn test_rejects_bad_factor() {
        let source = PixelBuffer::filled(8, 8, ColorMode::Grayscale, 0);
        assert!(source.scale(0.0).is_err());
        assert!(source.scale(2.0).is_err());
        assert!(source.scale(f32::NAN).is_err());
    }

    #[test]
    fn test_rejects_block_larger_than_source() {
        let source = PixelBuffer::filled(4, 4, ColorMode::Grayscale, 200);
        assert!(matches!(
            source.scale(1e-10),
            Err(SlicerError::InvalidInput(_))
        ));
        assert!(source.scale(0.2).is_err());
        // Exactly one block still scales
        assert_eq!(source.scale(0.25).unwrap().as_bytes(), &[200]);
    }

    #[test]
    fn test_huge_block_sum_does_not_overflow() {
        // 4200 * 4200 * 255 exceeds u32::MAX
        let source = PixelBuffer::filled(4200, 4200, ColorMode::Grayscale, 255);
        let scaled = source.scale(1.0 / 4200.0).unwrap();
        assert_eq!((scaled.width(), scaled.height()), (1, 1));
        assert_eq!(scaled.as_bytes(), &[255]);
    }
}

//! Ten-print card segmentation
//!
//! The slicer turns a full-resolution grayscale card into one rectangle per
//! fingerprint:
//! 1. Downscale by [`ANALYSIS_SCALE`] and binarize
//! 2. Trim the blank margin and frame ([`margins`])
//! 3. Split into top and bottom rows and strip guide lines ([`crate::filters`])
//! 4. Search each row's projection profiles for prints ([`search`])
//! 5. Map every rectangle back into the source frame

/// Slicer configuration and environment overrides
pub mod config;
/// Edge scans that locate the card content
pub mod margins;
/// Profile-based print search
pub mod search;
/// Diagnostic stage sinks
pub mod sink;

pub use config::{LayoutMode, SlicerConfig};
pub use sink::{DebugSink, MemorySink, NullSink, Stage};

use crate::error::{Result, SlicerError};
use crate::filters::FilterPipeline;
use crate::models::{PixelBuffer, Rectangle};
use margins::{MARGIN_PADDING, MARGIN_THRESHOLD, margin_trim};
use search::search_fingerprints;
use tracing::{debug, info, instrument, warn};

/// Reduction applied before analysis; rectangles are scaled back up by it
pub const ANALYSIS_SCALE: i32 = 8;

/// Intermediate geometry of one segmentation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceReport {
    /// Size of the downscaled analysis image
    pub analysis_size: (usize, usize),
    /// Margin trim, in analysis coordinates
    pub trim: Rectangle,
    /// Height of the top row, in analysis coordinates
    pub top_height: usize,
    /// Prints found in the top row, in analysis coordinates
    pub top: Vec<Rectangle>,
    /// Prints found in the bottom row, in bottom-row coordinates
    pub bottom: Vec<Rectangle>,
    /// Final rectangles in source coordinates, top row first
    pub rectangles: Vec<Rectangle>,
}

/// Locates the individual prints on a ten-print card
#[derive(Debug, Clone)]
pub struct Slicer {
    config: SlicerConfig,
    filters: FilterPipeline,
}

impl Slicer {
    /// Create a slicer after validating `config`
    pub fn new(config: SlicerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            filters: FilterPipeline::card(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    /// Rectangles for every print found on `image`, in `image` coordinates
    ///
    /// Top-row prints come first, each row left to right. A row that runs out
    /// of ink peaks contributes fewer rectangles instead of failing.
    pub fn calculate_slice(&self, image: &PixelBuffer) -> Result<Vec<Rectangle>> {
        self.calculate_slice_with_sink(image, &mut NullSink)
    }

    /// Same as [`Slicer::calculate_slice`], handing intermediate images to `sink`
    pub fn calculate_slice_with_sink(
        &self,
        image: &PixelBuffer,
        sink: &mut dyn DebugSink,
    ) -> Result<Vec<Rectangle>> {
        Ok(self.analyze(image, sink)?.rectangles)
    }

    /// Run the full pipeline and keep the intermediate geometry
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn analyze(&self, image: &PixelBuffer, sink: &mut dyn DebugSink) -> Result<SliceReport> {
        let mut scaled = image.scale(1.0 / ANALYSIS_SCALE as f32)?;
        if scaled.width() <= 2 * MARGIN_PADDING || scaled.height() <= 2 * MARGIN_PADDING {
            return Err(SlicerError::InvalidInput(format!(
                "{}x{} card is too small to slice",
                image.width(),
                image.height()
            )));
        }
        scaled.binarize(self.config.binarize_threshold);
        sink.inspect(Stage::Binarized, &scaled);

        let trim = margin_trim(&scaled, MARGIN_THRESHOLD, MARGIN_PADDING)?;
        let clip = scaled.cut(trim)?;
        if clip.height() < 2 {
            return Err(SlicerError::InvalidInput(format!(
                "margin trim {} leaves no room for two rows",
                trim
            )));
        }
        sink.inspect(Stage::Trimmed, &clip);
        debug!(%trim, "card trimmed");

        let (width, height) = (clip.width(), clip.height());
        let top_height = height / 2;
        let mut top_half = clip.cut(Rectangle::full(width, top_height))?;
        let mut bottom_half = clip.cut(Rectangle::new(0, width as i32, top_height as i32, height as i32))?;

        self.filters.apply(&mut top_half);
        self.filters.apply(&mut bottom_half);
        sink.inspect(Stage::TopHalf, &top_half);
        sink.inspect(Stage::BottomHalf, &bottom_half);

        let per_row = self.config.prints_per_row();
        let top = search_fingerprints(&top_half, per_row);
        let bottom = search_fingerprints(&bottom_half, per_row);

        let origin = trim.scale(ANALYSIS_SCALE);
        let rectangles: Vec<Rectangle> = top
            .iter()
            .map(|rect| rect.scale(ANALYSIS_SCALE))
            .chain(
                bottom
                    .iter()
                    .map(|rect| rect.expand(0, top_height as i32).scale(ANALYSIS_SCALE)),
            )
            .map(|rect| rect.expand(origin.left, origin.top))
            .collect();

        if rectangles.len() < self.config.expected_print_count {
            warn!(
                found = rectangles.len(),
                expected = self.config.expected_print_count,
                "fewer prints than expected"
            );
        }
        info!(prints = rectangles.len(), "card sliced");

        Ok(SliceReport {
            analysis_size: (scaled.width(), scaled.height()),
            trim,
            top_height,
            top,
            bottom,
            rectangles,
        })
    }
}

impl Default for Slicer {
    fn default() -> Self {
        Self {
            config: SlicerConfig::default(),
            filters: FilterPipeline::card(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorMode, WHITE_GRAYSCALE};

    const PAPER: u8 = 250;
    const INK: u8 = 60;

    /// 3040x1600 card with two rows of five 320x480 prints, block aligned
    fn ten_print_card() -> PixelBuffer {
        let mut card = PixelBuffer::filled(3040, 1600, ColorMode::Grayscale, PAPER);
        for top in [200, 920] {
            for i in 0..5 {
                let left = 240 + 560 * i;
                for y in top..top + 480 {
                    for x in left..left + 320 {
                        card.set_pixel(x, y, INK).unwrap();
                    }
                }
            }
        }
        card
    }

    #[test]
    fn test_rejects_tiny_card() {
        let card = PixelBuffer::filled(100, 100, ColorMode::Grayscale, WHITE_GRAYSCALE);
        assert!(matches!(
            Slicer::default().calculate_slice(&card),
            Err(SlicerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = SlicerConfig {
            expected_print_count: 3,
            ..SlicerConfig::default()
        };
        assert!(Slicer::new(config).is_err());
    }

    #[test]
    fn test_uniform_card_fails_trim() {
        // Nothing rises above the mean, so the whole card binarizes to ink
        let card = PixelBuffer::filled(800, 480, ColorMode::Grayscale, 220);
        assert!(matches!(
            Slicer::default().calculate_slice(&card),
            Err(SlicerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_ten_print_geometry() {
        let report = Slicer::default()
            .analyze(&ten_print_card(), &mut NullSink)
            .unwrap();

        assert_eq!(report.analysis_size, (380, 200));
        assert_eq!(report.trim, Rectangle::new(10, 370, 10, 190));
        assert_eq!(report.top_height, 90);
        assert_eq!(report.top.len(), 5);
        assert_eq!(report.bottom.len(), 5);
        assert_eq!(report.top[0], Rectangle::new(18, 61, 13, 76));
        assert_eq!(report.rectangles[0], Rectangle::new(224, 568, 184, 688));
        assert_eq!(report.rectangles[5], Rectangle::new(224, 568, 904, 1408));
    }

    #[test]
    fn test_sink_sees_every_stage() {
        let mut sink = MemorySink::default();

        let rects = Slicer::default()
            .calculate_slice_with_sink(&ten_print_card(), &mut sink)
            .unwrap();

        assert_eq!(rects.len(), 10);
        let stages: Vec<Stage> = sink.stages.iter().map(|(s, _)| *s).collect();
        assert_eq!(stages, Stage::ALL.to_vec());
        let binarized = sink.get(Stage::Binarized).unwrap();
        assert_eq!((binarized.width(), binarized.height()), (380, 200));
        assert_eq!(binarized.mode(), ColorMode::Binary);
        let top = sink.get(Stage::TopHalf).unwrap();
        assert_eq!((top.width(), top.height()), (360, 90));
    }
}

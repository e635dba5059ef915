use crate::models::PixelBuffer;

/// Intermediate images the slicer can expose for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Downscaled and binarized card
    Binarized,
    /// Card after margin trimming
    Trimmed,
    /// Filtered top row
    TopHalf,
    /// Filtered bottom row
    BottomHalf,
}

impl Stage {
    /// Every stage, in pipeline order
    pub const ALL: [Stage; 4] = [
        Stage::Binarized,
        Stage::Trimmed,
        Stage::TopHalf,
        Stage::BottomHalf,
    ];

    /// File stem used when a stage is written to disk
    pub fn file_stem(self) -> &'static str {
        match self {
            Stage::Binarized => "01_binarized",
            Stage::Trimmed => "02_clip",
            Stage::TopHalf => "03_top",
            Stage::BottomHalf => "04_bottom",
        }
    }
}

/// Receiver for intermediate images
///
/// Failures inside a sink are the sink's own business; they never abort
/// segmentation.
pub trait DebugSink {
    /// Called once per stage with the image as it stands at that point
    fn inspect(&mut self, stage: Stage, image: &PixelBuffer);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DebugSink for NullSink {
    fn inspect(&mut self, _stage: Stage, _image: &PixelBuffer) {}
}

/// Sink that keeps a copy of every stage in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    /// Captured stages, in the order they arrived
    pub stages: Vec<(Stage, PixelBuffer)>,
}

impl MemorySink {
    /// Captured image for `stage`, if any
    pub fn get(&self, stage: Stage) -> Option<&PixelBuffer> {
        self.stages
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, image)| image)
    }
}

impl DebugSink for MemorySink {
    fn inspect(&mut self, stage: Stage, image: &PixelBuffer) {
        self.stages.push((stage, image.clone()));
    }
}

//! File-system boundary shared by the CLI, benches and integration tests

/// Image decode/encode
pub mod codec;

pub use codec::{DEFAULT_QUALITY, ImageFormat, decode, encode, load, save};

use crate::error::{Result, SlicerError};
use crate::models::{PixelBuffer, Rectangle};
use crate::slicer::{DebugSink, NullSink, Slicer, Stage};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

/// How extracted prints are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceOptions {
    /// Root directory; each card gets its own sub-directory
    pub destination: PathBuf,
    /// Format of the extracted prints
    pub format: ImageFormat,
    /// JPEG quality for the extracted prints
    pub quality: u8,
    /// Also write the intermediate stages next to the prints
    pub demo: bool,
}

impl SliceOptions {
    /// Options writing JPEGs at the default quality under `destination`
    pub fn new<P: Into<PathBuf>>(destination: P) -> Self {
        Self {
            destination: destination.into(),
            format: ImageFormat::Jpeg,
            quality: DEFAULT_QUALITY,
            demo: false,
        }
    }
}

/// Outcome of slicing one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardReport {
    /// Card image that was read
    pub source: PathBuf,
    /// Directory the prints were written to
    pub output_dir: PathBuf,
    /// Rectangles in source coordinates, in file index order
    pub prints: Vec<Rectangle>,
}

/// Writes each diagnostic stage as `<dir>/<stage>.jpg`
///
/// Write failures are logged and otherwise ignored.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Sink writing into `dir`, which must already exist
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a stage is written to
    pub fn stage_path(&self, stage: Stage) -> PathBuf {
        self.dir
            .join(stage.file_stem())
            .with_extension(ImageFormat::Jpeg.extension())
    }
}

impl DebugSink for FileSink {
    fn inspect(&mut self, stage: Stage, image: &PixelBuffer) {
        let path = self.stage_path(stage);
        if let Err(err) = save(image, &path, ImageFormat::Jpeg, DEFAULT_QUALITY) {
            warn!(path = %path.display(), %err, "failed to write stage image");
        }
    }
}

fn is_card_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ImageFormat::from_extension(&ext.to_string_lossy()).is_ok())
}

/// Card images named by `path`
///
/// A file yields itself; a directory yields its JPEG and PNG entries (not
/// recursive), sorted by path.
pub fn collect_sources<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
    let path = path.as_ref();
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        return Err(SlicerError::InvalidInput(format!(
            "source {} does not exist",
            path.display()
        )));
    }

    let mut sources: Vec<PathBuf> = fs::read_dir(path)?
        .flatten()
        .map(|entry| entry.path())
        .filter(|p| is_card_image(p))
        .collect();
    sources.sort();

    if sources.is_empty() {
        return Err(SlicerError::InvalidInput(format!(
            "no card images found in {}",
            path.display()
        )));
    }
    Ok(sources)
}

/// Directory the prints of `source` are written to: `<destination>/<stem>`
pub fn output_dir(destination: &Path, source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| "card".into());
    destination.join(stem)
}

/// Decode one card, slice it and write `fp_<index>.<ext>` per print
#[instrument(skip_all, fields(source = %source.display()))]
pub fn slice_card(slicer: &Slicer, source: &Path, options: &SliceOptions) -> Result<CardReport> {
    let card = load(source)?;
    let dir = output_dir(&options.destination, source);
    fs::create_dir_all(&dir)?;

    let prints = if options.demo {
        slicer.calculate_slice_with_sink(&card, &mut FileSink::new(&dir))?
    } else {
        slicer.calculate_slice_with_sink(&card, &mut NullSink)?
    };

    for (index, rect) in prints.iter().enumerate() {
        let print = card.cut(*rect)?;
        let path = dir.join(format!("fp_{}.{}", index, options.format.extension()));
        save(&print, &path, options.format, options.quality)?;
        debug!(index, %rect, pixels = rect.area(), path = %path.display(), "print written");
    }
    info!(prints = prints.len(), dir = %dir.display(), "card written");

    Ok(CardReport {
        source: source.to_path_buf(),
        output_dir: dir,
        prints,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColorMode;
    use tempfile::TempDir;

    fn write_gray(path: &Path, width: usize, height: usize) {
        let buffer = PixelBuffer::filled(width, height, ColorMode::Grayscale, 200);
        save(&buffer, path, ImageFormat::from_path(path).unwrap(), DEFAULT_QUALITY).unwrap();
    }

    #[test]
    fn test_collect_sources_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        write_gray(&dir.path().join("b.png"), 4, 4);
        write_gray(&dir.path().join("a.JPG"), 4, 4);
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("nested.png")).unwrap();

        let sources = collect_sources(dir.path()).unwrap();

        let names: Vec<_> = sources
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.JPG", "b.png"]);
    }

    #[test]
    fn test_collect_sources_single_file_and_errors() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("card.png");
        write_gray(&file, 4, 4);

        assert_eq!(collect_sources(&file).unwrap(), vec![file.clone()]);
        assert!(collect_sources(dir.path().join("missing")).is_err());

        let empty = TempDir::new().unwrap();
        assert!(matches!(
            collect_sources(empty.path()),
            Err(SlicerError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_output_dir_uses_stem() {
        assert_eq!(
            output_dir(Path::new("/out"), Path::new("/cards/0042.jpg")),
            PathBuf::from("/out/0042")
        );
    }

    #[test]
    fn test_file_sink_writes_stage() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path());
        let image = PixelBuffer::filled(16, 16, ColorMode::Binary, 1);

        sink.inspect(Stage::Trimmed, &image);

        let path = sink.stage_path(Stage::Trimmed);
        assert!(path.ends_with("02_clip.jpg"));
        assert!(path.exists());
    }

    #[test]
    fn test_file_sink_ignores_write_failure() {
        let dir = TempDir::new().unwrap();
        let mut sink = FileSink::new(dir.path().join("missing"));
        sink.inspect(Stage::Binarized, &PixelBuffer::filled(8, 8, ColorMode::Binary, 1));
        assert!(!sink.stage_path(Stage::Binarized).exists());
    }

    #[test]
    fn test_slice_card_reports_decode_failure() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("broken.jpg");
        fs::write(&source, b"garbage").unwrap();

        let result = slice_card(&Slicer::default(), &source, &SliceOptions::new(dir.path()));

        assert!(matches!(result, Err(SlicerError::Decode(_))));
    }
}

//! Image file codec boundary
//!
//! The slicer core only sees [`PixelBuffer`]s; this module is the one place
//! that talks to the `image` crate.

use crate::error::{Result, SlicerError};
use crate::models::{ColorMode, PixelBuffer};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ColorType, DynamicImage, ImageEncoder};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Quality used for diagnostic stage images and the CLI default
pub const DEFAULT_QUALITY: u8 = 80;

/// On-disk formats the slicer reads and writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// Baseline JPEG
    #[default]
    Jpeg,
    /// Lossless PNG
    Png,
}

impl ImageFormat {
    /// Format for a file extension, case-insensitive
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpeg),
            "png" => Ok(ImageFormat::Png),
            other => Err(SlicerError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Format inferred from the extension of `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy())
            .ok_or_else(|| SlicerError::UnsupportedFormat(path.display().to_string()))?;
        Self::from_extension(&ext)
    }

    /// Extension written for this format
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }

    fn to_image(self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
        }
    }
}

impl FromStr for ImageFormat {
    type Err = SlicerError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_extension(s)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Decode an 8-bit grayscale image
pub fn decode(bytes: &[u8], format: ImageFormat) -> Result<PixelBuffer> {
    let image = image::load_from_memory_with_format(bytes, format.to_image())
        .map_err(|err| SlicerError::Decode(err.to_string()))?;

    match image {
        DynamicImage::ImageLuma8(gray) => {
            let (width, height) = gray.dimensions();
            PixelBuffer::from_raw(
                gray.into_raw(),
                width as usize,
                height as usize,
                ColorMode::Grayscale,
            )
        }
        other => Err(SlicerError::UnsupportedColor(format!("{:?}", other.color()))),
    }
}

/// Read and decode the image at `path`
pub fn load<P: AsRef<Path>>(path: P) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let format = ImageFormat::from_path(path)?;
    let bytes = std::fs::read(path)?;
    decode(&bytes, format)
}

/// Encode `buffer` as an 8-bit grayscale image
///
/// `quality` (1..=100) only affects JPEG. Binary buffers are written as 0/255.
pub fn encode(buffer: &PixelBuffer, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(SlicerError::InvalidInput(format!(
            "quality {} is outside 1..=100",
            quality
        )));
    }
    if buffer.is_empty() {
        return Err(SlicerError::Encode("cannot encode an empty image".to_string()));
    }

    let gray = match buffer.mode() {
        ColorMode::Grayscale => std::borrow::Cow::Borrowed(buffer),
        ColorMode::Binary => std::borrow::Cow::Owned(buffer.to_grayscale()),
    };
    let (width, height) = (gray.width() as u32, gray.height() as u32);

    let mut out = Vec::new();
    let result = match format {
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut out, quality).encode(
            gray.as_bytes(),
            width,
            height,
            ColorType::L8,
        ),
        ImageFormat::Png => {
            PngEncoder::new(&mut out).write_image(gray.as_bytes(), width, height, ColorType::L8)
        }
    };
    result.map_err(|err| SlicerError::Encode(err.to_string()))?;
    Ok(out)
}

/// Encode `buffer` and write it to `path`
pub fn save<P: AsRef<Path>>(
    buffer: &PixelBuffer,
    path: P,
    format: ImageFormat,
    quality: u8,
) -> Result<()> {
    let bytes = encode(buffer, format, quality)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

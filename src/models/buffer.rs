use crate::error::{Result, SlicerError};
use crate::models::Rectangle;

/// Ink value in both color modes
pub const BLACK: u8 = 0;
/// White value of a grayscale buffer
pub const WHITE_GRAYSCALE: u8 = 255;
/// White value of a binarized buffer
pub const WHITE_BINARY: u8 = 1;

/// Interpretation of the stored pixel values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// 0 (black) ..= 255 (white)
    Grayscale,
    /// 0 (ink) or 1 (paper)
    Binary,
}

impl ColorMode {
    /// White value for this mode
    pub fn white(self) -> u8 {
        match self {
            ColorMode::Grayscale => WHITE_GRAYSCALE,
            ColorMode::Binary => WHITE_BINARY,
        }
    }
}

/// Row-major 2D pixel array, one byte per pixel
///
/// Geometric operations (`scale`, `cut`) always produce new buffers and leave
/// the source untouched. Filters and `binarize` mutate in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    mode: ColorMode,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create an all-black buffer
    pub fn new(width: usize, height: usize, mode: ColorMode) -> Self {
        Self::filled(width, height, mode, BLACK)
    }

    /// Create a buffer with every pixel set to `value`
    pub fn filled(width: usize, height: usize, mode: ColorMode, value: u8) -> Self {
        Self {
            width,
            height,
            mode,
            data: vec![value; width * height],
        }
    }

    /// Wrap raw row-major pixels
    ///
    /// Fails when `data.len() != width * height` or when a binary buffer holds
    /// anything other than 0 or 1.
    pub fn from_raw(data: Vec<u8>, width: usize, height: usize, mode: ColorMode) -> Result<Self> {
        if data.len() != width * height {
            return Err(SlicerError::InvalidInput(format!(
                "{} bytes cannot back a {}x{} buffer",
                data.len(),
                width,
                height
            )));
        }
        if mode == ColorMode::Binary && data.iter().any(|&v| v > WHITE_BINARY) {
            return Err(SlicerError::InvalidInput(
                "binary buffer holds values other than 0 and 1".to_string(),
            ));
        }
        Ok(Self {
            width,
            height,
            mode,
            data,
        })
    }

    /// Buffer width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Buffer height
    pub fn height(&self) -> usize {
        self.height
    }

    /// Current color mode
    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    /// White value for the current mode
    pub fn white(&self) -> u8 {
        self.mode.white()
    }

    /// Black (ink) value
    pub fn black(&self) -> u8 {
        BLACK
    }

    /// True for a zero-sized buffer
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Raw pixel bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read pixel `(x, y)`
    pub fn pixel(&self, x: usize, y: usize) -> Result<u8> {
        let index = self.index(x, y)?;
        Ok(self.data[index])
    }

    /// Write pixel `(x, y)`; binary buffers only accept 0 or 1
    pub fn set_pixel(&mut self, x: usize, y: usize, value: u8) -> Result<()> {
        let index = self.index(x, y)?;
        if value > self.white() {
            return Err(SlicerError::InvalidInput(format!(
                "{} is not a valid {:?} pixel",
                value, self.mode
            )));
        }
        self.data[index] = value;
        Ok(())
    }

    /// Sum of raw pixel values down column `x` (0 when `x` is out of range)
    pub fn sum_column(&self, x: usize) -> u32 {
        if x >= self.width {
            return 0;
        }
        self.data
            .iter()
            .skip(x)
            .step_by(self.width)
            .map(|&v| v as u32)
            .sum()
    }

    /// Sum of raw pixel values along row `y` (0 when `y` is out of range)
    pub fn sum_row(&self, y: usize) -> u32 {
        if y >= self.height {
            return 0;
        }
        self.row(y).iter().map(|&v| v as u32).sum()
    }

    /// Sum of ink weight (`white - value`) down column `x`
    pub fn sum_ink_column(&self, x: usize) -> u32 {
        if x >= self.width {
            return 0;
        }
        self.white() as u32 * self.height as u32 - self.sum_column(x)
    }

    /// Sum of ink weight (`white - value`) along row `y`
    pub fn sum_ink_row(&self, y: usize) -> u32 {
        if y >= self.height {
            return 0;
        }
        self.white() as u32 * self.width as u32 - self.sum_row(y)
    }

    /// Block-average downscale by `factor` in `(0, 1]`
    ///
    /// See [`crate::utils::scaling::average_block_downscale`].
    pub fn scale(&self, factor: f32) -> Result<PixelBuffer> {
        crate::utils::scaling::average_block_downscale(self, factor)
    }

    /// Copy `[left, right) x [top, bottom)` into a new buffer
    pub fn cut(&self, rect: Rectangle) -> Result<PixelBuffer> {
        let inside = rect.left >= 0
            && rect.top >= 0
            && rect.left <= rect.right
            && rect.top <= rect.bottom
            && rect.right as usize <= self.width
            && rect.bottom as usize <= self.height;
        if !inside {
            return Err(SlicerError::InvalidRegion {
                rect,
                width: self.width,
                height: self.height,
            });
        }

        let (left, right) = (rect.left as usize, rect.right as usize);
        let (top, bottom) = (rect.top as usize, rect.bottom as usize);
        let mut data = Vec::with_capacity((right - left) * (bottom - top));
        for y in top..bottom {
            data.extend_from_slice(&self.row(y)[left..right]);
        }

        Ok(Self {
            width: right - left,
            height: bottom - top,
            mode: self.mode,
            data,
        })
    }

    /// Threshold against the mean of the non-background pixels
    ///
    /// See [`crate::utils::binarization::mean_binarize`].
    pub fn binarize(&mut self, umbral: i32) {
        crate::utils::binarization::mean_binarize(self, umbral);
    }

    /// Copy with binary pixels expanded to 0/255, ready for encoding
    pub fn to_grayscale(&self) -> PixelBuffer {
        match self.mode {
            ColorMode::Grayscale => self.clone(),
            ColorMode::Binary => Self {
                width: self.width,
                height: self.height,
                mode: ColorMode::Grayscale,
                data: self.data.iter().map(|&v| v * WHITE_GRAYSCALE).collect(),
            },
        }
    }

    pub(crate) fn set_mode(&mut self, mode: ColorMode) {
        self.mode = mode;
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Unchecked read for hot loops that already honor the bounds
    #[inline]
    pub(crate) fn at(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    #[inline]
    pub(crate) fn row(&self, y: usize) -> &[u8] {
        &self.data[y * self.width..(y + 1) * self.width]
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(SlicerError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new(0, 0, ColorMode::Grayscale)
    }
}

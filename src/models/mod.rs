/// Pixel buffer
pub mod buffer;
/// Integer rectangle
pub mod rect;

pub use buffer::{BLACK, ColorMode, PixelBuffer, WHITE_BINARY, WHITE_GRAYSCALE};
pub use rect::Rectangle;

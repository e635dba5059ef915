use crate::models::{BLACK, ColorMode, PixelBuffer, WHITE_BINARY};

/// Pixels at or below this level are scanner background and do not count
/// towards the mean
const BACKGROUND_LEVEL: u8 = 30;

/// Mean grayscale value over pixels brighter than the scanner background
///
/// Returns 0 when every pixel is background.
pub fn foreground_mean(gray: &[u8]) -> i32 {
    let mut sum: i64 = 0;
    let mut count: i64 = 0;
    for &pixel in gray {
        if pixel > BACKGROUND_LEVEL {
            sum += pixel as i64;
            count += 1;
        }
    }
    if count == 0 { 0 } else { (sum / count) as i32 }
}

/// Convert a grayscale buffer to binary in place
///
/// A pixel becomes paper (1) when it is brighter than `mean + umbral`, ink (0)
/// otherwise. The buffer switches to [`ColorMode::Binary`].
pub fn mean_binarize(buffer: &mut PixelBuffer, umbral: i32) {
    let threshold = foreground_mean(buffer.as_bytes()) + umbral;

    for pixel in buffer.data_mut() {
        *pixel = if (*pixel as i32) > threshold {
            WHITE_BINARY
        } else {
            BLACK
        };
    }

    buffer.set_mode(ColorMode::Binary);
}

use crate::models::PixelBuffer;

/// Force the outer `size`-pixel band on all four sides to `color`
pub fn edge_band(buffer: &mut PixelBuffer, size: usize, color: u8) {
    let (width, height) = (buffer.width(), buffer.height());
    let band_x = size.min(width);
    let band_y = size.min(height);
    let out = buffer.data_mut();

    for y in 0..height {
        let row = &mut out[y * width..(y + 1) * width];
        if y < band_y || y >= height - band_y {
            row.fill(color);
        } else {
            row[..band_x].fill(color);
            row[width - band_x..].fill(color);
        }
    }
}

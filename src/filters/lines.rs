use crate::models::PixelBuffer;

// All three strippers share the same sweep: every window centre `(x, y)` with
// `hw <= x < width - hw - 1` and `hh <= y < height - hh - 1`. Windows are
// tested against a snapshot and written into the live buffer.

/// Remove thin vertical rules
///
/// When the leftmost and rightmost columns of the `bw x bh` window are both
/// entirely white, the whole window is whitened. Windows that touch any ink on
/// either side column are left alone, so wide ink blobs survive.
pub fn strip_vertical_run(buffer: &mut PixelBuffer, bw: usize, bh: usize) {
    let (width, height) = (buffer.width(), buffer.height());
    let (hw, hh) = (bw / 2, bh / 2);
    let white = buffer.white();
    let full = white as u32 * (2 * hh + 1) as u32 * 2;

    let source = buffer.clone();
    let out = buffer.data_mut();

    for y in hh..height.saturating_sub(hh + 1) {
        for x in hw..width.saturating_sub(hw + 1) {
            let mut sum = 0u32;
            for yy in y - hh..=y + hh {
                sum += source.at(x - hw, yy) as u32 + source.at(x + hw, yy) as u32;
            }
            if sum == full {
                fill_window(out, width, x, y, hw, hh, white);
            }
        }
    }
}

/// Remove thin horizontal rules
///
/// The transpose of [`strip_vertical_run`]: compares the top and bottom rows of
/// the window and whitens it when both are entirely white.
pub fn strip_horizontal_white_run(buffer: &mut PixelBuffer, bw: usize, bh: usize) {
    let (width, height) = (buffer.width(), buffer.height());
    let (hw, hh) = (bw / 2, bh / 2);
    let white = buffer.white();
    let full = white as u32 * (2 * hw + 1) as u32 * 2;

    let source = buffer.clone();
    let out = buffer.data_mut();

    for y in hh..height.saturating_sub(hh + 1) {
        for x in hw..width.saturating_sub(hw + 1) {
            let top: u32 = source.row(y - hh)[x - hw..=x + hw]
                .iter()
                .map(|&v| v as u32)
                .sum();
            let bottom: u32 = source.row(y + hh)[x - hw..=x + hw]
                .iter()
                .map(|&v| v as u32)
                .sum();
            if top + bottom == full {
                fill_window(out, width, x, y, hw, hh, white);
            }
        }
    }
}

/// Consolidate solid black bars
///
/// Same window test as [`strip_horizontal_white_run`] on the ink complement:
/// when the top and bottom rows are entirely ink, the window is blackened.
pub fn strip_horizontal_black_run(buffer: &mut PixelBuffer, bw: usize, bh: usize) {
    let (width, height) = (buffer.width(), buffer.height());
    let (hw, hh) = (bw / 2, bh / 2);
    let black = buffer.black();
    let full = (2 * hw + 1) * 2;

    let source = buffer.clone();
    let out = buffer.data_mut();

    for y in hh..height.saturating_sub(hh + 1) {
        for x in hw..width.saturating_sub(hw + 1) {
            let top = source.row(y - hh)[x - hw..=x + hw]
                .iter()
                .filter(|&&v| v == black)
                .count();
            let bottom = source.row(y + hh)[x - hw..=x + hw]
                .iter()
                .filter(|&&v| v == black)
                .count();
            if top + bottom == full {
                fill_window(out, width, x, y, hw, hh, black);
            }
        }
    }
}

fn fill_window(
    out: &mut [u8],
    width: usize,
    x: usize,
    y: usize,
    hw: usize,
    hh: usize,
    value: u8,
) {
    for yy in y - hh..=y + hh {
        out[yy * width + x - hw..=yy * width + x + hw].fill(value);
    }
}

use crate::models::PixelBuffer;

/// Majority smoothing over a centred `bw x bh` window
///
/// Every pixel whose window lies fully inside the image becomes white when the
/// window average exceeds half the white value, black otherwise. Pixels closer
/// than half a window to the border are left untouched. Reads come from a
/// snapshot, so earlier writes never feed later windows.
pub fn block_majority(buffer: &mut PixelBuffer, bw: usize, bh: usize) {
    let (width, height) = (buffer.width(), buffer.height());
    let (hw, hh) = (bw / 2, bh / 2);
    let white = buffer.white();
    let black = buffer.black();
    let count = ((2 * hw + 1) * (2 * hh + 1)) as f64;
    let half_white = white as f64 / 2.0;

    let source = buffer.clone();
    let out = buffer.data_mut();

    for y in hh..height.saturating_sub(hh) {
        for x in hw..width.saturating_sub(hw) {
            let mut sum = 0u32;
            for yy in y - hh..=y + hh {
                sum += source.row(yy)[x - hw..=x + hw]
                    .iter()
                    .map(|&v| v as u32)
                    .sum::<u32>();
            }
            out[y * width + x] = if sum as f64 / count > half_white {
                white
            } else {
                black
            };
        }
    }
}

#![allow(dead_code)]

use fp_slicer::tools::collect_sources;
use fp_slicer::{ColorMode, PixelBuffer};
use std::env;
use std::path::PathBuf;

pub const PAPER: u8 = 250;
pub const INK: u8 = 60;

/// Two rows of five solid prints with a printed guide line between columns
pub fn synthetic_card(width: usize, height: usize) -> PixelBuffer {
    let mut card = PixelBuffer::filled(width, height, ColorMode::Grayscale, PAPER);
    let cell_w = width / 5;
    let cell_h = height / 2;
    for row in 0..2 {
        for col in 0..5 {
            let left = col * cell_w + cell_w / 5;
            let top = row * cell_h + cell_h / 5;
            for y in top..top + cell_h * 3 / 5 {
                for x in left..left + cell_w * 3 / 5 {
                    card.set_pixel(x, y, INK).expect("print inside the card");
                }
            }
            let rule = col * cell_w;
            for y in 0..height {
                card.set_pixel(rule, y, INK).expect("rule inside the card");
            }
        }
    }
    card
}

/// Real cards under `FP_DATASET_ROOT`, if set
pub fn dataset_cards() -> Vec<PathBuf> {
    match env::var("FP_DATASET_ROOT") {
        Ok(root) => collect_sources(root).unwrap_or_default(),
        Err(_) => Vec::new(),
    }
}

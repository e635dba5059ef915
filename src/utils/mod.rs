//! Pixel-level primitives
//!
//! This module provides the building blocks the slicer composes:
//! - Binarization (mean threshold over non-background pixels)
//! - Scaling (block-average downscale)
//! - Projection profiles (per-column / per-row sums)

/// Mean-threshold binarization
pub mod binarization;
/// Column and row projection profiles
pub mod profile;
/// Block-average downscaling
pub mod scaling;

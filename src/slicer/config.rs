use crate::error::{Result, SlicerError};
use tracing::warn;

fn parse_env_usize(name: &str, default: usize) -> usize {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(default)
}

fn parse_env_i32(name: &str, default: i32) -> i32 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<i32>().ok())
        .unwrap_or(default)
}

/// How prints are laid out on the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LayoutMode {
    /// Two rows of `expected_print_count / 2` prints
    #[default]
    General,
    /// Reserved; currently handled as [`LayoutMode::General`]
    Sector,
}

/// Slicer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicerConfig {
    /// Number of prints on the card; must be even
    pub expected_print_count: usize,
    /// Offset added to the foreground mean when binarizing
    pub binarize_threshold: i32,
    /// Card layout
    pub layout_mode: LayoutMode,
    /// Reserved for sector layouts
    pub block_size: usize,
}

impl Default for SlicerConfig {
    fn default() -> Self {
        Self {
            expected_print_count: 10,
            binarize_threshold: 10,
            layout_mode: LayoutMode::General,
            block_size: 20,
        }
    }
}

impl SlicerConfig {
    /// Defaults overlaid with `FP_PRINT_COUNT`, `FP_BINARIZE_THRESHOLD` and
    /// `FP_BLOCK_SIZE` from the environment
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            expected_print_count: parse_env_usize("FP_PRINT_COUNT", defaults.expected_print_count),
            binarize_threshold: parse_env_i32("FP_BINARIZE_THRESHOLD", defaults.binarize_threshold),
            layout_mode: defaults.layout_mode,
            block_size: parse_env_usize("FP_BLOCK_SIZE", defaults.block_size),
        }
    }

    /// Prints expected in each of the two rows
    pub fn prints_per_row(&self) -> usize {
        self.expected_print_count / 2
    }

    /// Reject configurations the two-row search cannot honor
    pub fn validate(&self) -> Result<()> {
        if self.expected_print_count == 0 || self.expected_print_count % 2 != 0 {
            return Err(SlicerError::InvalidInput(format!(
                "expected print count must be even and non-zero, got {}",
                self.expected_print_count
            )));
        }
        if !(-255..=255).contains(&self.binarize_threshold) {
            return Err(SlicerError::InvalidInput(format!(
                "binarize threshold {} is outside -255..=255",
                self.binarize_threshold
            )));
        }
        if self.block_size == 0 {
            return Err(SlicerError::InvalidInput(
                "block size must be non-zero".to_string(),
            ));
        }
        if self.layout_mode == LayoutMode::Sector {
            warn!("sector layout is not implemented; using the general two-row layout");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = SlicerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.prints_per_row(), 5);
    }

    #[test]
    fn test_rejects_odd_or_zero_count() {
        for count in [0, 1, 7] {
            let config = SlicerConfig {
                expected_print_count: count,
                ..SlicerConfig::default()
            };
            assert!(matches!(
                config.validate(),
                Err(SlicerError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn test_rejects_threshold_out_of_range() {
        let config = SlicerConfig {
            binarize_threshold: 300,
            ..SlicerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sector_mode_accepted() {
        let config = SlicerConfig {
            layout_mode: LayoutMode::Sector,
            ..SlicerConfig::default()
        };
        assert!(config.validate().is_ok());
    }
}

//! Per-run mining parameters.

use crate::error::{GrafitoError, Result};

/// Parameters for one search + materialization cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MineConfig {
    /// Minimum number of distinct occurrences a pattern must keep on every
    /// vertex domain. Must be at least 2.
    pub min_support: usize,
    /// Minimum vertex count for a pattern to be retained.
    pub min_pattern_vertices: usize,
}

impl Default for MineConfig {
    fn default() -> Self {
        Self {
            min_support: 2,
            min_pattern_vertices: 3,
        }
    }
}

impl MineConfig {
    /// Config with an explicit support threshold and the default size gate.
    pub fn with_support(min_support: usize) -> Self {
        Self {
            min_support,
            ..Self::default()
        }
    }

    /// Rejects parameter combinations the miner does not define behavior for.
    pub fn validate(&self) -> Result<()> {
        if self.min_support < 2 {
            return Err(GrafitoError::Invalid("min_support must be at least 2"));
        }
        if self.min_pattern_vertices < 2 {
            return Err(GrafitoError::Invalid(
                "min_pattern_vertices must be at least 2",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(MineConfig::default().validate().is_ok());
    }

    #[test]
    fn support_below_two_is_rejected() {
        let cfg = MineConfig::with_support(1);
        assert!(cfg.validate().is_err());
    }
}

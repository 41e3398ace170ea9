//! Validation settings.

use serde::{Deserialize, Serialize};

/// Knobs for the validation engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// How many levels of embedded objects may be nested below the top-level
    /// object. An embedded object deeper than this is rejected.
    pub max_nesting_depth: usize,
}

impl ValidationConfig {
    /// Default nesting limit.
    pub const DEFAULT_MAX_NESTING_DEPTH: usize = 16;
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_nesting_depth: Self::DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: ValidationConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg, ValidationConfig::default());
    }

    #[test]
    fn depth_is_configurable() {
        let cfg: ValidationConfig = serde_yaml::from_str("max_nesting_depth: 2").unwrap();
        assert_eq!(cfg.max_nesting_depth, 2);
    }
}

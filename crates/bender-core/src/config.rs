//! Evaluation settings
//!
//! Copyright (c) 2025 Bender Team
//! Licensed under the Apache-2.0 license

use serde::{Deserialize, Serialize};

/// Settings applied to a whole bend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendConfig {
    /// Deepest template nesting a bend may reach before giving up
    pub max_depth: usize,
}

impl BendConfig {
    pub const DEFAULT: BendConfig = BendConfig { max_depth: 128 };

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Defaults overridden by environment variables
    ///
    /// `BENDER_MAX_DEPTH` sets [`BendConfig::max_depth`]; values that do not
    /// parse as a positive integer are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(max_depth) = std::env::var("BENDER_MAX_DEPTH") {
            match max_depth.trim().parse::<usize>() {
                Ok(depth) if depth > 0 => config.max_depth = depth,
                _ => tracing::warn!(value = %max_depth, "ignoring invalid BENDER_MAX_DEPTH"),
            }
        }

        config
    }
}

impl Default for BendConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

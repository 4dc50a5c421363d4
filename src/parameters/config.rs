//! Engine configuration

use serde::{Deserialize, Serialize};

/// Options fixed when a [`Parameters`](super::Parameters) instance is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParametersConfig {
    /// Whether bare argument names receive scaled values (`_name` gets the other view)
    pub default_scaled: bool,

    /// Preload physical constants when the unit registry is SI
    pub constants: bool,
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            default_scaled: true,
            constants: false,
        }
    }
}

impl ParametersConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_scaled(mut self, default_scaled: bool) -> Self {
        self.default_scaled = default_scaled;
        self
    }

    pub fn with_constants(mut self, constants: bool) -> Self {
        self.constants = constants;
        self
    }
}

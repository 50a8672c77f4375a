use serde::{Deserialize, Serialize};

use crate::chart::validate_density;
use crate::core::Viewport;
use crate::error::{ChartError, ChartResult};

/// Public engine bootstrap configuration.
///
/// Serializable so hosts can persist and reload the canvas setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub viewport: Viewport,
    /// Device pixels per density-independent pixel.
    #[serde(default = "default_density")]
    pub density: f64,
}

impl ChartEngineConfig {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            density: default_density(),
        }
    }

    #[must_use]
    pub fn with_density(mut self, density: f64) -> Self {
        self.density = density;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        self.viewport.ensure_valid()?;
        validate_density(self.density)
    }

    pub fn to_json_pretty(self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self)
            .map_err(|e| ChartError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ChartError::InvalidData(format!("failed to parse config: {e}")))
    }
}

fn default_density() -> f64 {
    1.0
}

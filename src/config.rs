//! Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::compose::PrincipalAxis;
use crate::reliability::AlphaOptions;
use crate::Result;

/// Knobs for one `ScalePipeline` run. Missing JSON fields take the defaults.
///
/// ```json
/// { "sample_size": 500, "seed": 7 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Respondents per generated dataset.
    pub sample_size: usize,
    /// Base seed; scenarios offset it so each variant gets its own stream.
    pub seed: u64,
    /// Highest Likert label, used for reverse-coding.
    pub scale_max: f64,
    pub factor_max_iter: usize,
    pub factor_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_size: 200,
            seed: 42,
            scale_max: 5.0,
            factor_max_iter: 500,
            factor_tolerance: 1e-6,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn alpha_options(&self, reverse_detect: bool) -> AlphaOptions {
        AlphaOptions {
            reverse_detect,
            scale_max: self.scale_max,
        }
    }

    pub fn factor_extractor(&self) -> PrincipalAxis {
        PrincipalAxis {
            max_iter: self.factor_max_iter,
            tolerance: self.factor_tolerance,
        }
    }
}

//! Solver limits and their JSON storage.
//!
//! The iterative searches have no natural stopping point for targets that can
//! never be reached, so every solve runs under a [`SolverLimits`]. Defaults
//! cover any realistic observation; a JSON file can override them.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::solver::FAINTEST_TRIAL_MAGNITUDE;

/// Errors loading or saving solver limits
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid limit: {0}")]
    Invalid(String),
}

/// Iteration ceilings for the exposure-time and magnitude searches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverLimits {
    /// Longest exposure, in whole seconds, the exposure-time search will try
    pub max_exposure_seconds: u64,
    /// Brightest magnitude the limiting-magnitude search will try
    pub brightest_trial_magnitude: f64,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self {
            max_exposure_seconds: 1_000_000,
            brightest_trial_magnitude: -30.0,
        }
    }
}

impl SolverLimits {
    /// Check the limits describe a searchable range
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_exposure_seconds == 0 {
            return Err(ConfigError::Invalid(
                "max_exposure_seconds must be at least 1".to_string(),
            ));
        }
        if !self.brightest_trial_magnitude.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "brightest_trial_magnitude must be finite, got {}",
                self.brightest_trial_magnitude
            )));
        }
        if self.brightest_trial_magnitude > FAINTEST_TRIAL_MAGNITUDE {
            return Err(ConfigError::Invalid(format!(
                "brightest_trial_magnitude must not be fainter than {}, got {}",
                FAINTEST_TRIAL_MAGNITUDE, self.brightest_trial_magnitude
            )));
        }
        Ok(())
    }

    /// Load limits from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let limits: SolverLimits = serde_json::from_str(&contents)?;
        limits.validate()?;
        log::debug!("Loaded solver limits from {}: {:?}", path.display(), limits);
        Ok(limits)
    }

    /// Save limits as pretty-printed JSON
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::analysis::{FitSettings, DEFAULT_STEP_DAYS};
use crate::error::GrowthError;
use crate::models::BreedTable;

/// Forecast window settings for the fitted curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastSettings {
    /// Days between predicted points
    pub step_days: u32,
    /// Minimum forecast length past the latest observation; the window always
    /// reaches the breed's maturity age
    pub curve_horizon_weeks: u32,
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            step_days: DEFAULT_STEP_DAYS,
            curve_horizon_weeks: 26,
        }
    }
}

/// Engine configuration: optimizer settings, forecast window and breed table.
///
/// Every section is optional in TOML and falls back to the built-in values:
///
/// ```toml
/// [fit]
/// solver = "gradient-descent"
/// max_iterations = 100
///
/// [forecast]
/// step_days = 14
///
/// [[breeds.categories]]
/// category = "toy"
/// # ...
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub fit: FitSettings,
    pub forecast: ForecastSettings,
    pub breeds: BreedTable,
}

impl GrowthConfig {
    /// Parse and validate a TOML configuration.
    pub fn from_toml_str(content: &str) -> Result<Self, GrowthError> {
        let config: GrowthConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrowthError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), GrowthError> {
        if self.forecast.step_days == 0 {
            return Err(GrowthError::ValidationError(
                "forecast.step_days must be at least 1".to_string(),
            ));
        }
        if self.fit.max_iterations == 0 {
            return Err(GrowthError::ValidationError(
                "fit.max_iterations must be at least 1".to_string(),
            ));
        }
        if !(self.fit.learning_rate > 0.0) {
            return Err(GrowthError::ValidationError(format!(
                "fit.learning_rate must be positive, got {}",
                self.fit.learning_rate
            )));
        }
        if !(self.fit.finite_difference_step > 0.0) {
            return Err(GrowthError::ValidationError(format!(
                "fit.finite_difference_step must be positive, got {}",
                self.fit.finite_difference_step
            )));
        }
        if !(self.fit.divergence_tolerance >= 1.0) {
            return Err(GrowthError::ValidationError(format!(
                "fit.divergence_tolerance must be at least 1.0, got {}",
                self.fit.divergence_tolerance
            )));
        }
        if !(self.fit.max_relative_rmse > 0.0) {
            return Err(GrowthError::ValidationError(format!(
                "fit.max_relative_rmse must be positive, got {}",
                self.fit.max_relative_rmse
            )));
        }
        self.breeds.validate()
    }
}

//! User settings for Fiscally
//!
//! Holds the display currency, log filter, and the tunable parameters of
//! the analytics heuristics. Settings are passed into the engine explicitly;
//! nothing reads them from global state.

use serde::{Deserialize, Serialize};

use super::paths::FiscallyPaths;
use crate::error::FiscallyError;

/// Tunable parameters for the analytics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    /// Share of the monthly budget each category is measured against
    #[serde(default = "default_category_budget_ratio")]
    pub category_budget_ratio: f64,

    /// Planning horizon for goals without a deadline
    #[serde(default = "default_goal_horizon_months")]
    pub default_goal_horizon_months: u32,

    /// Spending faster than `expected * factor` triggers the over-pace insight
    #[serde(default = "default_over_pace_factor")]
    pub over_pace_factor: f64,

    /// Month-over-month delta (percent) below which spending counts as improved
    #[serde(default = "default_improvement_threshold_percent")]
    pub improvement_threshold_percent: i64,
}

fn default_category_budget_ratio() -> f64 {
    0.25
}

fn default_goal_horizon_months() -> u32 {
    12
}

fn default_over_pace_factor() -> f64 {
    1.2
}

fn default_improvement_threshold_percent() -> i64 {
    -10
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            category_budget_ratio: default_category_budget_ratio(),
            default_goal_horizon_months: default_goal_horizon_months(),
            over_pace_factor: default_over_pace_factor(),
            improvement_threshold_percent: default_improvement_threshold_percent(),
        }
    }
}

impl EngineSettings {
    /// Check the parameters are usable
    pub fn validate(&self) -> Result<(), FiscallyError> {
        if !self.category_budget_ratio.is_finite() || self.category_budget_ratio <= 0.0 {
            return Err(FiscallyError::Config(format!(
                "category_budget_ratio must be positive, got {}",
                self.category_budget_ratio
            )));
        }

        if self.default_goal_horizon_months == 0 {
            return Err(FiscallyError::Config(
                "default_goal_horizon_months must be at least 1".into(),
            ));
        }

        if !self.over_pace_factor.is_finite() || self.over_pace_factor <= 0.0 {
            return Err(FiscallyError::Config(format!(
                "over_pace_factor must be positive, got {}",
                self.over_pace_factor
            )));
        }

        Ok(())
    }
}

/// User settings for Fiscally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// ISO currency code shown alongside amounts
    #[serde(default = "default_currency_code")]
    pub currency_code: String,

    /// Default tracing filter when `FISCALLY_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// Analytics parameters
    #[serde(default)]
    pub engine: EngineSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency_code() -> String {
    "INR".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency_code: default_currency_code(),
            log_filter: default_log_filter(),
            engine: EngineSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &FiscallyPaths) -> Result<Self, FiscallyError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
                FiscallyError::Io(format!("Failed to read settings file: {}", e))
            })?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                FiscallyError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            settings.engine.validate()?;
            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FiscallyPaths) -> Result<(), FiscallyError> {
        paths.ensure_directories()?;

        let settings_path = paths.settings_file();
        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            FiscallyError::Config(format!("Failed to serialize settings: {}", e))
        })?;

        std::fs::write(&settings_path, contents).map_err(|e| {
            FiscallyError::Io(format!("Failed to write settings file: {}", e))
        })?;

        Ok(())
    }
}

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::errors::{ScenarioError, ScenarioResult};

pub const DEFAULT_PROPERTIES_PATH: &str = "src/test/resources/projectdata.properties";

pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // Logging Configuration
    #[serde(default = "default_log_level")]
    pub log_level: String,

    // Project properties file
    #[serde(default = "default_properties_path")]
    pub properties_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            properties_path: default_properties_path(),
        }
    }
}

impl Settings {
    /// Loads `.env` into the process environment, then layers `SCENARIO_*`
    /// variables over the defaults.
    pub fn from_env() -> ScenarioResult<Self> {
        dotenvy::dotenv().ok();
        Self::load(config::Environment::with_prefix("SCENARIO"))
    }

    /// Same layering as `from_env`, reading `SCENARIO_*` keys from `vars`
    /// instead of the process environment.
    pub fn from_map(vars: HashMap<String, String>) -> ScenarioResult<Self> {
        Self::load(config::Environment::with_prefix("SCENARIO").source(Some(vars)))
    }

    fn load(environment: config::Environment) -> ScenarioResult<Self> {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(environment)
            .build()?;
        let mut settings: Settings = settings.try_deserialize()?;

        // Validate required settings
        settings.validate()?;
        settings.log_level = settings.log_level.to_ascii_lowercase();

        Ok(settings)
    }

    fn validate(&self) -> ScenarioResult<()> {
        validate_log_level(&self.log_level)?;

        if self.properties_path.trim().is_empty() {
            return Err(ScenarioError::InvalidSetting {
                name: "properties_path".to_string(),
                reason: format!(
                    "SCENARIO_PROPERTIES_PATH must not be empty; unset it to use {DEFAULT_PROPERTIES_PATH}"
                ),
            });
        }

        Ok(())
    }
}

/// Checks a level name against `LOG_LEVELS`, ignoring case, and returns it
/// lowercased.
pub fn validate_log_level(level: &str) -> ScenarioResult<String> {
    let normalized = level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&normalized.as_str()) {
        return Err(ScenarioError::InvalidSetting {
            name: "log_level".to_string(),
            reason: format!("{:?} is not one of {}", level, LOG_LEVELS.join(", ")),
        });
    }
    Ok(normalized)
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_properties_path() -> String {
    DEFAULT_PROPERTIES_PATH.to_string()
}

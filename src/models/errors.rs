use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

#[derive(Debug, Error)]
pub enum ScenarioError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] config::ConfigError),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },

    // Properties file errors
    #[error("Invalid properties file at line {line}: {reason}")]
    InvalidProperties { line: usize, reason: String },

    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    // URL errors
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // Serialization errors
    #[error("JSON serialization failed: {0}")]
    JsonSerialization(#[from] serde_json::Error),

    // System errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScenarioError {
    pub fn is_critical(&self) -> bool {
        matches!(
            self,
            ScenarioError::Configuration(_) | ScenarioError::InvalidSetting { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_errors() {
        assert!(ScenarioError::Configuration(config::ConfigError::Message(
            "bad source".to_string()
        ))
        .is_critical());
        assert!(ScenarioError::InvalidSetting {
            name: "log_level".to_string(),
            reason: "unknown".to_string(),
        }
        .is_critical());
        assert!(!ScenarioError::PropertyNotFound("url".to_string()).is_critical());
    }

    #[test]
    fn test_error_display() {
        let err = ScenarioError::InvalidProperties {
            line: 3,
            reason: "malformed \\uxxxx encoding".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid properties file at line 3: malformed \\uxxxx encoding"
        );
    }
}

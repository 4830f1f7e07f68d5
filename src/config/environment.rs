// Environment variable utilities
use std::collections::HashMap;
use std::env;

/// Process-wide variable carrying the environment token.
pub const ENV_TOKEN_VAR: &str = "SCENARIO_ENV";

pub fn get_optional_env(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Source of environment variables, so callers can read the token without
/// touching `std::env` directly.
pub trait EnvironmentSource: Send + Sync {
    fn get_var(&self, key: &str) -> Option<String>;

    fn get_var_or(&self, key: &str, default: &str) -> String {
        self.get_var(key).unwrap_or_else(|| default.to_string())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl EnvironmentSource for ProcessEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        get_optional_env(key)
    }
}

/// Fixed in-memory variables.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }
}

impl EnvironmentSource for StaticEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

pub fn read_env_token(source: &dyn EnvironmentSource) -> Option<String> {
    source.get_var(ENV_TOKEN_VAR)
}

use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

use crate::models::errors::ScenarioResult;

pub const DEFAULT_APP_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const STAGING_APP_BASE_URL: &str = "https://staging-api.example.com";
pub const PROD_APP_BASE_URL: &str = "https://api.example.com";

/// Environment token selecting which base URL test scenarios run against.
///
/// The set is open: any token other than `dev`, `staging` or `prod` is kept
/// verbatim in `Other` and resolves like `dev`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum EnvironmentName {
    #[default]
    Dev,
    Staging,
    Prod,
    Other(String),
}

impl EnvironmentName {
    /// Absent and empty tokens become `Dev`. Matching is exact and
    /// case-sensitive, so `"PROD"` is `Other`.
    pub fn parse(token: Option<&str>) -> Self {
        match token {
            None | Some("") | Some("dev") => EnvironmentName::Dev,
            Some("staging") => EnvironmentName::Staging,
            Some("prod") => EnvironmentName::Prod,
            Some(other) => EnvironmentName::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            EnvironmentName::Dev => "dev",
            EnvironmentName::Staging => "staging",
            EnvironmentName::Prod => "prod",
            EnvironmentName::Other(token) => token,
        }
    }

    pub fn app_base_url(&self) -> &'static str {
        match self {
            EnvironmentName::Staging => STAGING_APP_BASE_URL,
            EnvironmentName::Prod => PROD_APP_BASE_URL,
            EnvironmentName::Dev | EnvironmentName::Other(_) => DEFAULT_APP_BASE_URL,
        }
    }
}

impl fmt::Display for EnvironmentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration handed to the test framework for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioConfig {
    pub app_base_url: String,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::for_environment(&EnvironmentName::default())
    }
}

impl ScenarioConfig {
    pub fn for_environment(env: &EnvironmentName) -> Self {
        Self {
            app_base_url: env.app_base_url().to_string(),
        }
    }

    pub fn base_url(&self) -> ScenarioResult<Url> {
        Ok(Url::parse(&self.app_base_url)?)
    }

    /// Joins a request path onto the base URL. Relative and root-relative
    /// paths both land directly under the host.
    pub fn request_url(&self, path: &str) -> ScenarioResult<Url> {
        Ok(self.base_url()?.join(path)?)
    }

    pub fn to_json(&self) -> ScenarioResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> ScenarioResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

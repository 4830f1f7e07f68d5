use tracing::info;

use crate::config::environment::{read_env_token, EnvironmentSource};
use crate::models::scenario::{EnvironmentName, ScenarioConfig};

/// Resolves the scenario configuration for an environment token.
///
/// Total over every input: absent or empty tokens mean `dev`, and tokens that
/// are not an exact match for `staging` or `prod` fall back to the default
/// base URL.
pub fn resolve_config(env: Option<&str>) -> ScenarioConfig {
    info!("Environment token was: {:?}", env);
    let env = EnvironmentName::parse(env);
    ScenarioConfig::for_environment(&env)
}

pub fn resolve_from_source(source: &dyn EnvironmentSource) -> ScenarioConfig {
    let token = read_env_token(source);
    resolve_config(token.as_deref())
}

pub mod environment;
pub mod resolver;
pub mod settings;

pub use environment::{EnvironmentSource, ProcessEnvironment, StaticEnvironment, ENV_TOKEN_VAR};
pub use resolver::{resolve_config, resolve_from_source};
pub use settings::{validate_log_level, Settings};

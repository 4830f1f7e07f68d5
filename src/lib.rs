pub mod config;
pub mod models;
pub mod storage;
pub mod utils;

// Re-export main types for convenience
pub use config::{resolve_config, Settings};
pub use models::errors::{ScenarioError, ScenarioResult};
pub use models::scenario::{EnvironmentName, ScenarioConfig};
pub use storage::PropertyStore;

pub mod errors;
pub mod scenario;

pub use errors::{ScenarioError, ScenarioResult};
pub use scenario::{EnvironmentName, ScenarioConfig};

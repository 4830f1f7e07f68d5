use anyhow::Result;
use clap::{Parser, Subcommand};
use scenario_config::config::{
    resolve_config, resolve_from_source, validate_log_level, EnvironmentSource,
    ProcessEnvironment, Settings,
};
use scenario_config::storage::PropertyStore;
use scenario_config::utils::init_tracing;
use scenario_config::ScenarioError;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Resolve base URL configuration for behavior-test scenarios",
    long_about = r#"
Resolve base URL configuration for behavior-test scenarios.

The environment token comes from --env, else SCENARIO_ENV (a .env file is
honored). Absent or empty tokens mean "dev"; unknown tokens use the default
base URL.

EXAMPLES:
    scenario-config resolve --env staging
    SCENARIO_ENV=prod scenario-config resolve --pretty
    scenario-config get url --default https://tutorialsninja.com/demo
    scenario-config set browser firefox
"#
)]
struct Args {
    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the resolved scenario configuration as JSON
    Resolve {
        /// Environment token (overrides SCENARIO_ENV)
        #[arg(long)]
        env: Option<String>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },
    /// Print a value from the project properties file
    Get {
        key: String,

        /// Value to print when the key is absent
        #[arg(long)]
        default: Option<String>,
    },
    /// Write a value to the project properties file
    Set { key: String, value: String },
}

fn main() -> ExitCode {
    let args = Args::parse();

    match try_main(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            let critical = e
                .downcast_ref::<ScenarioError>()
                .is_some_and(ScenarioError::is_critical);
            if critical {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn try_main(args: Args) -> Result<()> {
    // Load configuration
    let settings = Settings::from_env()?;

    let log_level = match args.log_level {
        Some(level) => validate_log_level(&level)?,
        None => settings.log_level.clone(),
    };
    init_tracing(&log_level)?;

    if let Some(output) = run(args.command, &settings, &ProcessEnvironment)? {
        println!("{output}");
    }
    Ok(())
}

/// Executes one command and returns what should be printed to stdout.
fn run(
    command: Command,
    settings: &Settings,
    source: &dyn EnvironmentSource,
) -> Result<Option<String>> {
    match command {
        Command::Resolve { env, pretty } => {
            let config = match env {
                Some(token) => resolve_config(Some(&token)),
                None => resolve_from_source(source),
            };
            let json = if pretty {
                config.to_json_pretty()?
            } else {
                config.to_json()?
            };
            Ok(Some(json))
        }
        Command::Get { key, default } => {
            let store = PropertyStore::from_settings(settings);
            let value = match default {
                Some(default) => store.get_or(&key, &default)?,
                None => store.require(&key)?,
            };
            Ok(Some(value))
        }
        Command::Set { key, value } => {
            let store = PropertyStore::from_settings(settings);
            store.set(&key, &value)?;
            tracing::info!("Updated {} in {}", key, store.path().display());
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scenario_config::config::{StaticEnvironment, ENV_TOKEN_VAR};
    use tempfile::TempDir;

    fn settings_in(dir: &TempDir) -> Settings {
        Settings {
            properties_path: dir
                .path()
                .join("projectdata.properties")
                .to_string_lossy()
                .to_string(),
            ..Settings::default()
        }
    }

    fn resolve(env: Option<&str>, source: &StaticEnvironment) -> String {
        let command = Command::Resolve {
            env: env.map(str::to_string),
            pretty: false,
        };
        run(command, &Settings::default(), source).unwrap().unwrap()
    }

    #[test]
    fn test_env_flag_overrides_environment() {
        let source = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prod");
        assert_eq!(
            resolve(Some("staging"), &source),
            r#"{"appBaseUrl":"https://staging-api.example.com"}"#
        );
    }

    #[test]
    fn test_resolve_falls_back_to_environment() {
        let source = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prod");
        assert_eq!(
            resolve(None, &source),
            r#"{"appBaseUrl":"https://api.example.com"}"#
        );

        assert_eq!(
            resolve(None, &StaticEnvironment::new()),
            r#"{"appBaseUrl":"https://jsonplaceholder.typicode.com"}"#
        );
    }

    #[test]
    fn test_empty_env_flag_means_dev() {
        let source = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prod");
        assert_eq!(
            resolve(Some(""), &source),
            r#"{"appBaseUrl":"https://jsonplaceholder.typicode.com"}"#
        );
    }

    #[test]
    fn test_get_missing_key_without_default_fails() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let command = Command::Get {
            key: "browser".to_string(),
            default: None,
        };

        let err = run(command, &settings, &StaticEnvironment::new()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScenarioError>(),
            Some(ScenarioError::PropertyNotFound(key)) if key == "browser"
        ));
    }

    #[test]
    fn test_get_missing_key_with_default() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let command = Command::Get {
            key: "browser".to_string(),
            default: Some("chrome".to_string()),
        };

        let output = run(command, &settings, &StaticEnvironment::new()).unwrap();
        assert_eq!(output.as_deref(), Some("chrome"));
    }

    #[test]
    fn test_set_then_get_uses_settings_path() {
        let dir = TempDir::new().unwrap();
        let settings = settings_in(&dir);
        let source = StaticEnvironment::new();

        let set = Command::Set {
            key: "browser".to_string(),
            value: "firefox".to_string(),
        };
        assert_eq!(run(set, &settings, &source).unwrap(), None);
        assert!(dir.path().join("projectdata.properties").exists());

        let get = Command::Get {
            key: "browser".to_string(),
            default: None,
        };
        assert_eq!(
            run(get, &settings, &source).unwrap().as_deref(),
            Some("firefox")
        );
    }

    #[test]
    fn test_invalid_log_level_flag_is_critical() {
        let args = Args::parse_from(["scenario-config", "--log-level", "loud", "resolve"]);
        let err = validate_log_level(args.log_level.as_deref().unwrap()).unwrap_err();
        assert!(err.is_critical());
    }
}

#[cfg(test)]
mod tests {
    use scenario_config::config::{resolve_from_source, StaticEnvironment, ENV_TOKEN_VAR};
    use scenario_config::storage::{Properties, PropertyStore};
    use scenario_config::{resolve_config, EnvironmentName, ScenarioConfig, Settings};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use url::Url;

    #[test]
    fn test_staging_end_to_end() {
        let config = resolve_config(Some("staging"));
        assert_eq!(
            config,
            ScenarioConfig {
                app_base_url: "https://staging-api.example.com".to_string(),
            }
        );
        assert_eq!(
            config.to_json().unwrap(),
            r#"{"appBaseUrl":"https://staging-api.example.com"}"#
        );
    }

    #[test]
    fn test_every_token_yields_absolute_url() {
        let tokens = [None, Some(""), Some("dev"), Some("staging"), Some("prod"), Some("qa"), Some("PROD")];
        for token in tokens {
            let config = resolve_config(token);
            assert!(!config.app_base_url.is_empty());
            let url = Url::parse(&config.app_base_url).unwrap();
            assert!(url.has_host(), "token {token:?}");
            assert_eq!(url.scheme(), "https");
        }
    }

    #[test]
    fn test_environment_source_feeds_resolver() {
        let source = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prod");
        assert_eq!(resolve_from_source(&source).app_base_url, "https://api.example.com");

        let typo = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prd");
        assert_eq!(
            resolve_from_source(&typo).app_base_url,
            EnvironmentName::Dev.app_base_url()
        );
    }

    #[test]
    fn test_settings_drive_properties_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("resources/projectdata.properties");

        let mut vars = HashMap::new();
        vars.insert(
            "SCENARIO_PROPERTIES_PATH".to_string(),
            path.to_string_lossy().to_string(),
        );
        let settings = Settings::from_map(vars).unwrap();
        let source = StaticEnvironment::new().with_var(ENV_TOKEN_VAR, "prod");
        let config = resolve_from_source(&source);
        assert_eq!(config.app_base_url, "https://api.example.com");

        let store = PropertyStore::from_settings(&settings);
        let base = config.request_url("posts").unwrap();
        store.set("postsUrl", base.as_str()).unwrap();
        store.set("browser", "chrome").unwrap();

        assert_eq!(
            store.get("postsUrl").unwrap().as_deref(),
            Some("https://api.example.com/posts")
        );
        assert_eq!(store.get_or("headless", "false").unwrap(), "false");

        let loaded = store.load().unwrap();
        let expected: Properties = [
            ("browser".to_string(), "chrome".to_string()),
            ("postsUrl".to_string(), "https://api.example.com/posts".to_string()),
        ]
        .into_iter()
        .collect();
        assert_eq!(loaded, expected);
    }
}

//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::DemoConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::observability::Level;

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from the environment, and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<DemoConfig, ConfigError> {
    resolve_config(Some(path), None)
}

/// Build the effective config: the file at `path` (or defaults), then
/// `LOG_*` environment overrides, then the `bind` override, then validation.
pub fn resolve_config(path: Option<&Path>, bind: Option<String>) -> Result<DemoConfig, ConfigError> {
    let config = match path {
        Some(path) => toml::from_str(&fs::read_to_string(path)?)?,
        None => DemoConfig::default(),
    };
    finish_config(config, bind, |key| std::env::var(key).ok())
}

fn finish_config<F>(
    mut config: DemoConfig,
    bind: Option<String>,
    lookup: F,
) -> Result<DemoConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup);
    if let Some(bind) = bind {
        config.bind_address = bind;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply `LOG_*` overrides from `lookup` on top of `config`.
pub fn apply_env_overrides<F>(config: &mut DemoConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup("LOG_SERVICE_NAME") {
        config.logger.service_name = name;
    }
    if let Some(version) = lookup("LOG_SERVICE_VERSION") {
        config.logger.service_version = version;
    }
    if let Some(env) = lookup("LOG_ENV") {
        config.logger.env = env;
    }
    if let Some(level) = lookup("LOG_LEVEL") {
        config.logger.level = Level::parse_lossy(&level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [("LOG_LEVEL", "WARN"), ("LOG_ENV", "production")]
            .into_iter()
            .collect();

        let mut config = DemoConfig::default();
        apply_env_overrides(&mut config, |key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.logger.level, Level::Warn);
        assert_eq!(config.logger.env, "production");
        assert_eq!(config.logger.service_name, "unknown-service");
    }

    #[test]
    fn test_env_level_is_case_sensitive() {
        let mut config = DemoConfig::default();
        config.logger.level = Level::Error;
        apply_env_overrides(&mut config, |key| (key == "LOG_LEVEL").then(|| "warn".to_string()));

        assert_eq!(config.logger.level, Level::Info);
    }

    #[test]
    fn test_defaults_get_env_overrides_and_validation() {
        let config = finish_config(DemoConfig::default(), None, |key| {
            (key == "LOG_SERVICE_NAME").then(|| "billing".to_string())
        })
        .unwrap();
        assert_eq!(config.logger.service_name, "billing");

        let err = finish_config(DemoConfig::default(), None, |key| {
            (key == "LOG_SERVICE_NAME").then(String::new)
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_bind_override_is_validated() {
        let config = finish_config(DemoConfig::default(), Some("127.0.0.1:9000".into()), |_| None).unwrap();
        assert_eq!(config.bind_address, "127.0.0.1:9000");

        let err = finish_config(DemoConfig::default(), Some("localhost".into()), |_| None).unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::InvalidBindAddress("localhost".into())]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}

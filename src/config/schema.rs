//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! default every field, so a partial file (or none at all) is valid.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::observability::Level;

/// Logger configuration, captured once at initialization.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Emitted as `service.name`.
    pub service_name: String,

    /// Emitted as `service.version`.
    pub service_version: String,

    /// Deployment environment, emitted as `env`.
    pub env: String,

    /// Minimum severity emitted. Unrecognized names fall back to INFO.
    pub level: Level,

    /// Optional logger name, emitted as `logger`.
    pub name: Option<String>,

    /// Attach a `stacktrace` to records at or above this severity.
    pub stacktrace_level: Option<Level>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            service_name: "unknown-service".to_string(),
            service_version: "0.0.0".to_string(),
            env: "development".to_string(),
            level: Level::Info,
            name: None,
            stacktrace_level: None,
        }
    }
}

/// Access-logging middleware options.
///
/// `AccessLogOptions::default()` is the same as passing no options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AccessLogOptions {
    /// Paths that are never logged. Exact string match only.
    pub exclude_paths: HashSet<String>,

    /// Include the full request header map as `headers`.
    pub include_headers: bool,

    /// Reserved. Request bodies are never logged.
    pub include_body: bool,
}

impl AccessLogOptions {
    pub fn exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_paths.extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn with_headers(mut self, include: bool) -> Self {
        self.include_headers = include;
        self
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_paths.contains(path)
    }
}

/// Root configuration for the demo service binary.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    pub logger: LoggerConfig,

    pub access_log: AccessLogOptions,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            logger: LoggerConfig::default(),
            access_log: AccessLogOptions::default().exclude(["/health"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: DemoConfig = toml::from_str(
            r#"
            [logger]
            service_name = "orders"
            level = "DEBUG"
            "#,
        )
        .unwrap();

        assert_eq!(config.logger.service_name, "orders");
        assert_eq!(config.logger.level, Level::Debug);
        assert_eq!(config.logger.env, "development");
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert!(config.access_log.is_excluded("/health"));
    }

    #[test]
    fn test_unrecognized_level_is_info() {
        let config: LoggerConfig = toml::from_str(r#"level = "CHATTY""#).unwrap();
        assert_eq!(config.level, Level::Info);
    }

    #[test]
    fn test_exclusion_is_exact() {
        let opts = AccessLogOptions::default().exclude(["/health"]);
        assert!(opts.is_excluded("/health"));
        assert!(!opts.is_excluded("/health/live"));
        assert!(!opts.is_excluded("/healthz"));
    }
}

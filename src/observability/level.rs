//! Severity levels and record categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a record. Ordered `Debug < Info < Warn < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Level {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl Level {
    /// Parse a level name, falling back to `Info` for anything unrecognized.
    ///
    /// Names are matched exactly: `"warn"` is not `WARN`.
    pub fn parse_lossy(s: &str) -> Self {
        s.parse().unwrap_or(Level::Info)
    }

    /// Capitalized name used for `log.level`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Error returned when a string does not name a level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Level::Debug),
            "INFO" => Ok(Level::Info),
            "WARN" => Ok(Level::Warn),
            "ERROR" => Ok(Level::Error),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<String> for Level {
    fn from(s: String) -> Self {
        Level::parse_lossy(&s)
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.as_str().to_string()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Semantic tag emitted as `log_type`. Independent of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Normal,
    Http,
    Error,
    Security,
    Audit,
    Debug,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Normal => "normal",
            Category::Http => "http",
            Category::Error => "error",
            Category::Security => "security",
            Category::Audit => "audit",
            Category::Debug => "debug",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_ordering() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        assert_eq!(Level::parse_lossy("TRACE"), Level::Info);
        assert_eq!(Level::parse_lossy(""), Level::Info);
        assert!("verbose".parse::<Level>().is_err());
    }

    #[test]
    fn test_level_names_are_exact() {
        assert_eq!(Level::parse_lossy("WARN"), Level::Warn);
        assert_eq!(Level::parse_lossy("ERROR"), Level::Error);
        for name in ["warn", "Warn", "WARNING", " WARN", "error", "debug"] {
            assert_eq!(Level::parse_lossy(name), Level::Info, "{:?}", name);
        }
    }

    #[test]
    fn test_level_deserializes_lossily() {
        #[derive(Deserialize)]
        struct Wrapper {
            level: Level,
        }

        let w: Wrapper = serde_json::from_str(r#"{"level":"ERROR"}"#).unwrap();
        assert_eq!(w.level, Level::Error);

        let w: Wrapper = serde_json::from_str(r#"{"level":"LOUD"}"#).unwrap();
        assert_eq!(w.level, Level::Info);

        let w: Wrapper = serde_json::from_str(r#"{"level":"warn"}"#).unwrap();
        assert_eq!(w.level, Level::Info);
    }
}

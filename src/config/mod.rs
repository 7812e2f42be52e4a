//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse or defaults, LOG_* environment overrides, --bind)
//!     → validation.rs (semantic checks)
//!     → DemoConfig (validated, immutable)
//!     → LoggerConfig captured by the logger at initialization
//! ```
//!
//! # Design Decisions
//! - Config is immutable once the logger is built; there is no reload
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::{AccessLogOptions, DemoConfig, LoggerConfig};

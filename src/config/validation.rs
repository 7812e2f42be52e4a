//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the bind address parses
//! - Require a service name, since every record carries it
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - An unrecognized log level is not an error; it falls back to INFO

use std::net::SocketAddr;

use crate::config::schema::DemoConfig;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("logger.service_name must not be empty")]
    EmptyServiceName,

    #[error("bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &DemoConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.logger.service_name.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    if config.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(config.bind_address.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

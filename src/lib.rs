//! Structured JSON logging for backend services.
//!
//! A [`Logger`] writes one JSON object per line, enriched with service
//! metadata and trace/span ids, and two axum middlewares log requests and
//! recover from handler panics.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{AccessLogOptions, LoggerConfig};
pub use observability::{Category, Fields, Level, Logger, TraceContext, Value};

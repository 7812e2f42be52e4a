//! Structured JSON logger.
//!
//! # Responsibilities
//! - Encode one JSON object per call with fixed key names
//! - Attach constant service metadata to every record
//! - Filter by minimum severity
//! - Provide the process-wide instance set up at startup
//!
//! # Design Decisions
//! - `Logger` is an ordinary value; components receive it as `Arc<Logger>`
//! - The process-wide slot is a `OnceLock`: the first `initialize` wins and
//!   every later call returns the same instance, whatever config it passes
//! - Sink write failures never reach the caller; they go to `tracing`

use std::backtrace::Backtrace;
use std::io;
use std::panic::Location;
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value as JsonValue};

use crate::config::LoggerConfig;
use crate::observability::fields::{build_fields, substitute_error};
use crate::observability::level::{Category, Level};
use crate::observability::sink::Sink;
use crate::observability::trace::TraceContext;
use crate::observability::value::Fields;

pub const TIMESTAMP_KEY: &str = "@timestamp";
pub const LEVEL_KEY: &str = "log.level";
pub const NAME_KEY: &str = "logger";
pub const CALLER_KEY: &str = "caller";
pub const MESSAGE_KEY: &str = "message";
pub const STACKTRACE_KEY: &str = "stacktrace";

static INSTANCE: OnceLock<Arc<Logger>> = OnceLock::new();

/// Structured logger writing JSON lines to a [`Sink`].
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
    sink: Arc<Sink>,
    name: Option<String>,
    constant_fields: Map<String, JsonValue>,
}

impl Logger {
    /// Build a logger writing to standard output.
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_sink(config, Sink::stdout())
    }

    /// Build a logger writing to `sink`.
    pub fn with_sink(config: LoggerConfig, sink: impl Into<Sink>) -> Self {
        let host_name = gethostname::gethostname()
            .into_string()
            .unwrap_or_default();

        let mut constant_fields = Map::new();
        constant_fields.insert("service.name".into(), config.service_name.clone().into());
        constant_fields.insert("service.version".into(), config.service_version.clone().into());
        constant_fields.insert("env".into(), config.env.clone().into());
        constant_fields.insert("host.name".into(), host_name.into());

        Self {
            name: config.name.clone(),
            config,
            sink: Arc::new(sink.into()),
            constant_fields,
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Whether a record at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.config.level
    }

    /// A child logger that adds `fields` to every record.
    pub fn with_fields(&self, fields: Fields) -> Logger {
        let mut constant_fields = self.constant_fields.clone();
        constant_fields.extend(fields.to_json());
        Logger {
            config: self.config.clone(),
            sink: Arc::clone(&self.sink),
            name: self.name.clone(),
            constant_fields,
        }
    }

    /// A child logger with `name` appended to this logger's name.
    pub fn named(&self, name: &str) -> Logger {
        let name = match &self.name {
            Some(parent) if !name.is_empty() => format!("{}.{}", parent, name),
            Some(parent) => parent.clone(),
            None => name.to_string(),
        };
        Logger {
            config: self.config.clone(),
            sink: Arc::clone(&self.sink),
            name: Some(name),
            constant_fields: self.constant_fields.clone(),
        }
    }

    #[track_caller]
    pub fn info(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Info, Category::Normal, cx, message, fields);
    }

    /// Log at ERROR. An error object under `error` is replaced by
    /// `error_message` and `error_type`.
    #[track_caller]
    pub fn error(&self, cx: Option<&dyn TraceContext>, message: &str, mut fields: Fields) {
        substitute_error(&mut fields);
        self.log(Level::Error, Category::Error, cx, message, fields);
    }

    #[track_caller]
    pub fn warn(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Warn, Category::Normal, cx, message, fields);
    }

    #[track_caller]
    pub fn debug(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Debug, Category::Debug, cx, message, fields);
    }

    /// Request/response records, at INFO.
    #[track_caller]
    pub fn http(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Info, Category::Http, cx, message, fields);
    }

    /// Security events, at WARN.
    #[track_caller]
    pub fn security(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Warn, Category::Security, cx, message, fields);
    }

    /// Audit trail events, at INFO.
    #[track_caller]
    pub fn audit(&self, cx: Option<&dyn TraceContext>, message: &str, fields: Fields) {
        self.log(Level::Info, Category::Audit, cx, message, fields);
    }

    /// Flush buffered output. Call once during shutdown.
    pub fn sync(&self) -> io::Result<()> {
        self.sink.flush()
    }

    #[track_caller]
    fn log(
        &self,
        level: Level,
        category: Category,
        cx: Option<&dyn TraceContext>,
        message: &str,
        fields: Fields,
    ) {
        if !self.enabled(level) {
            return;
        }

        let record = self.encode(level, category, cx, message, fields, Location::caller());
        let mut line = match serde_json::to_vec(&record) {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to encode log record");
                return;
            }
        };
        line.push(b'\n');

        if let Err(e) = self.sink.write_line(&line) {
            tracing::warn!(error = %e, "Failed to write log record");
        }
    }

    fn encode(
        &self,
        level: Level,
        category: Category,
        cx: Option<&dyn TraceContext>,
        message: &str,
        fields: Fields,
        caller: &Location<'_>,
    ) -> Map<String, JsonValue> {
        let mut record = Map::new();
        record.insert(
            TIMESTAMP_KEY.into(),
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true).into(),
        );
        record.insert(LEVEL_KEY.into(), level.as_str().into());
        if let Some(name) = &self.name {
            record.insert(NAME_KEY.into(), name.clone().into());
        }
        record.insert(CALLER_KEY.into(), short_caller(caller).into());
        record.insert(MESSAGE_KEY.into(), message.into());
        if self.config.stacktrace_level.is_some_and(|min| level >= min) {
            record.insert(
                STACKTRACE_KEY.into(),
                Backtrace::force_capture().to_string().into(),
            );
        }

        for (key, value) in &self.constant_fields {
            record.insert(key.clone(), value.clone());
        }
        for (key, value) in build_fields(cx, category, fields) {
            record.insert(key, value.to_json());
        }
        record
    }
}

/// `dir/file.rs:line`, keeping only the last directory component.
fn short_caller(location: &Location<'_>) -> String {
    let file = location.file();
    let mut parts = file.rsplitn(3, ['/', '\\']);
    let short = match (parts.next(), parts.next()) {
        (Some(name), Some(dir)) => format!("{}/{}", dir, name),
        _ => file.to_string(),
    };
    format!("{}:{}", short, location.line())
}

/// Build the process-wide logger on first call; return it on every call.
///
/// Only the first call's configuration is used.
pub fn initialize(config: LoggerConfig) -> Arc<Logger> {
    init_once(&INSTANCE, config, Logger::new)
}

/// Like [`initialize`], writing to `sink` instead of standard output.
pub fn initialize_with_sink(config: LoggerConfig, sink: impl Into<Sink>) -> Arc<Logger> {
    init_once(&INSTANCE, config, |config| Logger::with_sink(config, sink))
}

fn init_once<F>(slot: &OnceLock<Arc<Logger>>, config: LoggerConfig, build: F) -> Arc<Logger>
where
    F: FnOnce(LoggerConfig) -> Logger,
{
    slot.get_or_init(|| {
        tracing::debug!(
            service = %config.service_name,
            level = %config.level,
            "Logger initialized"
        );
        Arc::new(build(config))
    })
    .clone()
}

/// The process-wide logger, if initialized.
pub fn try_instance() -> Option<Arc<Logger>> {
    INSTANCE.get().cloned()
}

/// The process-wide logger.
///
/// # Panics
///
/// Panics if [`initialize`] has not been called.
#[track_caller]
pub fn instance() -> Arc<Logger> {
    match try_instance() {
        Some(logger) => logger,
        None => panic!("logger not initialized; call initialize() first"),
    }
}

/// Milliseconds elapsed since `start`.
pub fn measure_duration(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

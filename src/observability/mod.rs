//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! caller (trace context, message, fields)
//!     → logger.rs (severity filter, constant fields)
//!     → fields.rs (log_type, trace ids, caller fields)
//!     → trace.rs (trace/span ids from the carried context)
//!     → sink.rs (one JSON line per record)
//!
//! Crate diagnostics:
//!     → logging.rs (tracing subscriber on stderr)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace ids flow from request context into every record
//! - Records below the configured level are dropped before encoding

pub mod fields;
pub mod level;
pub mod logger;
pub mod logging;
pub mod sink;
pub mod trace;
pub mod value;

pub use level::{Category, Level};
pub use logger::{initialize, initialize_with_sink, instance, measure_duration, try_instance, Logger};
pub use sink::{MemorySink, Sink};
pub use trace::TraceContext;
pub use value::{ErrorValue, Fields, Value};

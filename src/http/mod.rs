//! HTTP integration subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, connect info)
//!     → middleware/access_log.rs (timing, status classification)
//!     → middleware/recovery.rs (panic barrier)
//!     → handler
//! ```

pub mod middleware;
pub mod server;

pub use middleware::{install, AccessLog, RequestTrace, UserId};
pub use server::DemoServer;

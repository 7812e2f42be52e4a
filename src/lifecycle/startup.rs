//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize the process-wide logger from configuration
//! - Bind the listener and serve the demo service
//! - Flush the logger after the server stops
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - A failed final flush is reported but does not fail shutdown

use tokio::net::TcpListener;

use crate::config::DemoConfig;
use crate::http::DemoServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the demo service until a shutdown signal arrives.
pub async fn run(config: DemoConfig) -> Result<(), StartupError> {
    let logger = observability::initialize(config.logger.clone());

    let listener = TcpListener::bind(&config.bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: config.bind_address.clone(),
            source,
        })?;

    let shutdown = Shutdown::new();
    let server = DemoServer::new(config, logger.clone());
    let server_shutdown = shutdown.subscribe();

    let mut serve = tokio::spawn(server.run(listener, server_shutdown));

    let joined = tokio::select! {
        joined = &mut serve => joined,
        _ = signals::shutdown_signal() => {
            shutdown.trigger();
            serve.await
        }
    };

    if !shutdown.is_triggered() {
        tracing::warn!("HTTP server exited without a shutdown signal");
    }

    let result = match joined {
        Ok(result) => result.map_err(StartupError::Serve),
        Err(e) => Err(StartupError::Serve(std::io::Error::other(e))),
    };

    if let Err(e) = logger.sync() {
        tracing::warn!(error = %e, "Failed to flush logger");
    }

    result
}

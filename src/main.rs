//! Structured logger demo service.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ access_log ──▶ recover ──▶ handler
//!                         │             │           │
//!                         ▼             ▼           ▼
//!                    ┌──────────────────────────────────┐
//!                    │              Logger              │
//!                    │  level filter → fields → JSON    │
//!                    └────────────────┬─────────────────┘
//!                                     ▼
//!                                   stdout
//! ```

use std::path::PathBuf;

use clap::Parser;

use structured_logger::config::resolve_config;
use structured_logger::lifecycle::startup;
use structured_logger::observability::logging;

#[derive(Parser, Debug)]
#[command(name = "structured-logger", about = "Structured JSON logging demo service")]
struct Args {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_diagnostics(logging::DEFAULT_FILTER);

    let args = Args::parse();

    let config = resolve_config(args.config.as_deref(), args.bind)?;

    tracing::info!(
        bind_address = %config.bind_address,
        service = %config.logger.service_name,
        level = %config.logger.level,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

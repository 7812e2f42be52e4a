//! Demo HTTP service.
//!
//! # Responsibilities
//! - Create Axum Router with sample handlers
//! - Wire up middleware (access log, panic recovery, tower-http tracing)
//! - Serve until the shutdown signal fires

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::config::DemoConfig;
use crate::http::middleware::{install, RequestTrace, UserId};
use crate::observability::{Fields, Logger};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub logger: Arc<Logger>,
}

/// HTTP server for the demo service.
pub struct DemoServer {
    router: Router,
    config: DemoConfig,
}

impl DemoServer {
    pub fn new(config: DemoConfig, logger: Arc<Logger>) -> Self {
        let router = Self::build_router(&config, AppState { logger });
        Self { router, config }
    }

    fn build_router(config: &DemoConfig, state: AppState) -> Router {
        let logger = Arc::clone(&state.logger);
        let routes = Router::new()
            .route("/health", get(health))
            .route("/users/{id}", get(get_user))
            .route("/admin", get(admin))
            .route("/panic", get(panic_handler))
            .with_state(state);

        install(routes, logger, config.access_log.clone()).layer(TraceLayer::new_for_http())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    /// Serve on `listener` until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn health() -> &'static str {
    "ok"
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    trace: RequestTrace,
) -> impl IntoResponse {
    state.logger.audit(
        trace.as_context(),
        "User profile viewed",
        Fields::new().with("user_id", id.as_str()).with("action", "view_profile"),
    );

    (Extension(UserId(id.clone())), Json(json!({ "id": id })))
}

async fn admin(State(state): State<AppState>, trace: RequestTrace) -> impl IntoResponse {
    state.logger.security(
        trace.as_context(),
        "Unauthorized admin access attempt",
        Fields::new().with("resource", "/admin"),
    );

    StatusCode::FORBIDDEN
}

async fn panic_handler() -> &'static str {
    panic!("demo handler panicked")
}

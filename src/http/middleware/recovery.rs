//! Panic Recovery Middleware.
//! Converts a panicking handler into a logged error and a fixed 500 response.

use std::any::Any;
use std::error::Error as StdError;
use std::io;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use futures_util::FutureExt;
use serde_json::json;

use crate::http::middleware::RequestTrace;
use crate::observability::{ErrorValue, Fields, Logger, Value};

pub const PANIC_MESSAGE: &str = "Panic recovered";

pub async fn recover(State(logger): State<Arc<Logger>>, request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let trace = RequestTrace::from_parts(request.extensions(), request.headers());

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let fields = Fields::new()
                .with("method", method)
                .with("path", path)
                .with("panic", panic_value(payload.as_ref()))
                .with("status_code", 500u16);

            logger.error(trace.as_context(), PANIC_MESSAGE, fields);
            internal_error()
        }
    }
}

/// The fixed response sent in place of a panicking handler.
pub fn internal_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": "internal server error" })),
    )
        .into_response()
}

fn panic_value(payload: &(dyn Any + Send)) -> Value {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Value::Str(s.to_string())
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Value::Str(s.clone())
    } else if let Some(err) = payload.downcast_ref::<ErrorValue>() {
        Value::Error(err.clone())
    } else if let Some(err) = payload.downcast_ref::<Box<dyn StdError + Send + Sync>>() {
        Value::Str(err.to_string())
    } else if let Some(err) = payload.downcast_ref::<io::Error>() {
        Value::Str(err.to_string())
    } else {
        Value::Str("unknown panic payload".to_string())
    }
}

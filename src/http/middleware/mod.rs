//! Request-pipeline middlewares.
//!
//! # Layer Order
//! ```text
//! request → access_log → recover → handler
//! ```
//! The access log sits outside the recovery barrier so it records the
//! final status, including the 500 substituted for a panic. Use
//! [`install`] to get this order.

pub mod access_log;
pub mod recovery;

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{Extensions, HeaderMap};
use axum::middleware::from_fn_with_state;
use axum::Router;

use crate::config::AccessLogOptions;
use crate::observability::trace::{extract_from_headers, TraceContext};
use crate::observability::Logger;

pub use access_log::{access_log, AccessLog};
pub use recovery::recover;

/// Authenticated user, attached to request or response extensions.
///
/// The access log reports it as `user_id`. A value on the response wins
/// over one set on the request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserId(pub String);

/// Trace context of the current request.
///
/// Taken from an `opentelemetry::Context` in the request extensions, or
/// failing that from the W3C `traceparent` header.
#[derive(Clone, Debug, Default)]
pub struct RequestTrace(pub Option<opentelemetry::Context>);

impl RequestTrace {
    pub fn from_parts(extensions: &Extensions, headers: &HeaderMap) -> Self {
        let cx = extensions
            .get::<opentelemetry::Context>()
            .cloned()
            .or_else(|| extract_from_headers(headers));
        RequestTrace(cx)
    }

    pub fn as_context(&self) -> Option<&dyn TraceContext> {
        self.0.as_ref().map(|cx| cx as &dyn TraceContext)
    }
}

impl<S> FromRequestParts<S> for RequestTrace
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestTrace::from_parts(&parts.extensions, &parts.headers))
    }
}

/// Wrap `router` with recovery (inner) and access logging (outer).
pub fn install<S>(router: Router<S>, logger: Arc<Logger>, options: AccessLogOptions) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(from_fn_with_state(Arc::clone(&logger), recover))
        .layer(from_fn_with_state(AccessLog::new(logger, options), access_log))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggerConfig;
    use crate::observability::{Level, MemorySink};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    async fn boom() -> &'static str {
        panic!("handler exploded")
    }

    fn logger() -> (Arc<Logger>, MemorySink) {
        let memory = MemorySink::new();
        let config = LoggerConfig {
            level: Level::Debug,
            ..LoggerConfig::default()
        };
        (Arc::new(Logger::with_sink(config, memory.clone())), memory)
    }

    #[tokio::test]
    async fn test_access_log_sees_recovered_status() {
        let (logger, memory) = logger();
        let app: Router = install(
            Router::new().route("/boom", get(boom)),
            logger,
            AccessLogOptions::default(),
        );

        let response = app
            .oneshot(Request::builder().uri("/boom").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let records = memory.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["message"], "Panic recovered");
        assert_eq!(records[1]["message"], "GET /boom 500");
        assert_eq!(records[1]["log.level"], "ERROR");
        assert_eq!(records[1]["status_code"], 500);
    }

    #[tokio::test]
    async fn test_request_trace_extractor() {
        async fn handler(trace: RequestTrace) -> String {
            trace
                .as_context()
                .and_then(|cx| cx.trace_ids())
                .map(|(trace_id, _)| trace_id.to_string())
                .unwrap_or_default()
        }

        let app: Router = Router::new().route("/", get(handler));
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header("traceparent", "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"4bf92f3577b34da6a3ce929d0e0e4736");
    }
}

//! Access Logging Middleware.
//! Times each request and logs it, classified by final status code.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::config::AccessLogOptions;
use crate::http::middleware::{RequestTrace, UserId};
use crate::observability::{instance, measure_duration, Fields, Logger};

/// State for the access-logging middleware.
#[derive(Clone, Debug)]
pub struct AccessLog {
    logger: Arc<Logger>,
    options: Arc<AccessLogOptions>,
}

impl AccessLog {
    pub fn new(logger: Arc<Logger>, options: AccessLogOptions) -> Self {
        Self {
            logger,
            options: Arc::new(options),
        }
    }

    /// Use the process-wide logger. `None` means default options.
    ///
    /// # Panics
    ///
    /// Panics if the logger has not been initialized.
    pub fn from_instance(options: Option<AccessLogOptions>) -> Self {
        Self::new(instance(), options.unwrap_or_default())
    }
}

pub async fn access_log(State(state): State<AccessLog>, request: Request, next: Next) -> Response {
    // 1. Excluded paths bypass logging entirely (exact match).
    let path = request.uri().path().to_string();
    if state.options.is_excluded(&path) {
        return next.run(request).await;
    }

    // 2. Capture request details before the request is moved downstream.
    let method = request.method().to_string();
    let query = request.uri().query().unwrap_or_default().to_string();
    let ip = client_ip(&request);
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let headers = state
        .options
        .include_headers
        .then(|| header_fields(request.headers()));
    let request_user = request.extensions().get::<UserId>().cloned();
    let trace = RequestTrace::from_parts(request.extensions(), request.headers());

    // 3. Run the rest of the chain.
    let start_time = Instant::now();
    let response = next.run(request).await;
    let duration_ms = measure_duration(start_time);

    let status_code = response.status().as_u16();
    let mut fields = Fields::new()
        .with("method", method.as_str())
        .with("path", path.as_str())
        .with("status_code", status_code)
        .with("duration_ms", duration_ms)
        .with("ip", ip)
        .with("user_agent", user_agent);

    if !query.is_empty() {
        fields.insert("query", query);
    }
    if let Some(headers) = headers {
        fields.insert("headers", headers);
    }
    let user = response.extensions().get::<UserId>().cloned().or(request_user);
    if let Some(UserId(user_id)) = user {
        fields.insert("user_id", user_id);
    }

    // 4. Classify by final status.
    let message = format!("{} {} {}", method, path, status_code);
    let cx = trace.as_context();
    match status_code {
        s if s >= 500 => state.logger.error(cx, &message, fields),
        400..=499 => state.logger.warn(cx, &message, fields),
        _ => state.logger.http(cx, &message, fields),
    }

    response
}

fn client_ip(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_default()
}

/// Header map as fields; repeated names are joined with ", ".
fn header_fields(headers: &HeaderMap) -> Fields {
    let mut fields = Fields::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        fields.insert(name.as_str(), joined);
    }
    fields
}

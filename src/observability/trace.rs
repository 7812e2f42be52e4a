//! Distributed tracing context.
//!
//! # Responsibilities
//! - Extract trace and span identifiers from a request-scoped context
//! - Extract W3C Trace Context (`traceparent`) from incoming request headers
//!
//! # Design Decisions
//! - Extraction is a pure lookup over whatever context the caller carries;
//!   no global tracer is consulted
//! - Validity is all-or-nothing: a context yields both ids or neither

use axum::http::HeaderMap;
use opentelemetry::propagation::{Extractor, TextMapPropagator};
use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceId};
use opentelemetry_sdk::propagation::TraceContextPropagator;

/// A carrier from which a valid trace/span pair may be read.
pub trait TraceContext {
    /// The trace and span ids, if this context carries a valid span.
    fn trace_ids(&self) -> Option<(TraceId, SpanId)>;
}

impl TraceContext for SpanContext {
    fn trace_ids(&self) -> Option<(TraceId, SpanId)> {
        self.is_valid().then(|| (self.trace_id(), self.span_id()))
    }
}

impl TraceContext for opentelemetry::Context {
    fn trace_ids(&self) -> Option<(TraceId, SpanId)> {
        self.span().span_context().trace_ids()
    }
}

impl<T: TraceContext> TraceContext for Option<T> {
    fn trace_ids(&self) -> Option<(TraceId, SpanId)> {
        self.as_ref().and_then(TraceContext::trace_ids)
    }
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|value| value.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(|name| name.as_str()).collect()
    }
}

/// Extract a remote span context from `traceparent`/`tracestate` headers.
///
/// Returns `None` when the headers are absent or malformed.
pub fn extract_from_headers(headers: &HeaderMap) -> Option<opentelemetry::Context> {
    if !headers.contains_key("traceparent") {
        return None;
    }

    let propagator = TraceContextPropagator::new();
    let cx = propagator.extract(&HeaderExtractor(headers));
    let valid = cx.span().span_context().is_valid();
    valid.then_some(cx)
}

//! Per-record field assembly.

use crate::observability::level::Category;
use crate::observability::trace::TraceContext;
use crate::observability::value::{Fields, Value};

pub const LOG_TYPE: &str = "log_type";
pub const TRACE_ID: &str = "trace_id";
pub const SPAN_ID: &str = "span_id";
pub const ERROR: &str = "error";
pub const ERROR_MESSAGE: &str = "error_message";
pub const ERROR_TYPE: &str = "error_type";

/// Marker written to `error_type` when an error object was unpacked.
pub const ERROR_TYPE_MARKER: &str = "error";

/// Trace fields for `cx`, empty when absent or invalid.
pub fn trace_fields(cx: Option<&dyn TraceContext>) -> Vec<(String, Value)> {
    match cx.and_then(|cx| cx.trace_ids()) {
        Some((trace_id, span_id)) => vec![
            (TRACE_ID.to_string(), Value::Str(trace_id.to_string())),
            (SPAN_ID.to_string(), Value::Str(span_id.to_string())),
        ],
        None => Vec::new(),
    }
}

/// Replace an error object under `error` with `error_message` and `error_type`.
///
/// Any other value under `error` is left alone.
pub fn substitute_error(fields: &mut Fields) {
    if !matches!(fields.get(ERROR), Some(Value::Error(_))) {
        return;
    }
    if let Some(Value::Error(err)) = fields.remove(ERROR) {
        fields.insert(ERROR_MESSAGE, err.message());
        fields.insert(ERROR_TYPE, ERROR_TYPE_MARKER);
    }
}

/// Assemble the ordered per-call fields: `log_type`, trace ids, then caller fields.
///
/// Caller keys are not checked against the reserved names; a caller field
/// named `log_type` or `trace_id` replaces the value set here.
pub fn build_fields(
    cx: Option<&dyn TraceContext>,
    category: Category,
    fields: Fields,
) -> Vec<(String, Value)> {
    let mut out = Vec::with_capacity(fields.len() + 3);
    out.push((LOG_TYPE.to_string(), Value::Str(category.as_str().to_string())));
    out.extend(trace_fields(cx));
    out.extend(fields);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::{SpanContext, SpanId, TraceFlags, TraceId, TraceState};

    #[derive(Debug, thiserror::Error)]
    #[error("database unavailable")]
    struct DbDown;

    fn span_context() -> SpanContext {
        SpanContext::new(
            TraceId::from_hex("0af7651916cd43dd8448eb211c80319c").unwrap(),
            SpanId::from_hex("b7ad6b7169203331").unwrap(),
            TraceFlags::SAMPLED,
            false,
            TraceState::default(),
        )
    }

    fn keys(built: &[(String, Value)]) -> Vec<&str> {
        built.iter().map(|(k, _)| k.as_str()).collect()
    }

    #[test]
    fn test_log_type_comes_first() {
        let built = build_fields(None, Category::Audit, Fields::new().with("action", "delete"));
        assert_eq!(keys(&built), vec!["log_type", "action"]);
        assert_eq!(built[0].1, Value::Str("audit".into()));
    }

    #[test]
    fn test_trace_ids_follow_log_type() {
        let sc = span_context();
        let built = build_fields(Some(&sc), Category::Normal, Fields::new().with("k", "v"));
        assert_eq!(keys(&built), vec!["log_type", "trace_id", "span_id", "k"]);
        assert_eq!(built[1].1, Value::Str("0af7651916cd43dd8448eb211c80319c".into()));
        assert_eq!(built[2].1, Value::Str("b7ad6b7169203331".into()));
    }

    #[test]
    fn test_invalid_context_omits_trace_ids() {
        let empty = opentelemetry::Context::new();
        let built = build_fields(Some(&empty), Category::Normal, Fields::new());
        assert_eq!(keys(&built), vec!["log_type"]);
    }

    #[test]
    fn test_substitute_error_object() {
        let mut fields = Fields::new().with("error", Value::error(DbDown)).with("retry", 3);
        substitute_error(&mut fields);

        assert!(!fields.contains_key("error"));
        assert_eq!(fields.get("error_message").and_then(Value::as_str), Some("database unavailable"));
        assert_eq!(fields.get("error_type").and_then(Value::as_str), Some("error"));
        assert_eq!(fields.get("retry"), Some(&Value::I64(3)));
    }

    #[test]
    fn test_non_error_value_passes_through() {
        let mut fields = Fields::new().with("error", "just a string");
        substitute_error(&mut fields);

        assert_eq!(fields.get("error").and_then(Value::as_str), Some("just a string"));
        assert!(!fields.contains_key("error_message"));
        assert!(!fields.contains_key("error_type"));
    }
}

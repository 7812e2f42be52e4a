//! Using the process-wide logger before initialization.
//!
//! Nothing in this test binary initializes the logger.

use structured_logger::http::AccessLog;
use structured_logger::observability;

#[test]
fn test_try_instance_is_none() {
    assert!(observability::try_instance().is_none());
}

#[test]
#[should_panic(expected = "logger not initialized")]
fn test_instance_panics() {
    observability::instance();
}

#[test]
#[should_panic(expected = "logger not initialized")]
fn test_middleware_from_instance_panics() {
    AccessLog::from_instance(None);
}

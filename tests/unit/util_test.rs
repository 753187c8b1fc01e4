//! Tests for utility functions

use slot_booker::util::{init_tracing, now_ms, DEFAULT_LOG_FILTER};

#[test]
fn test_clock_is_monotonic_enough() {
    let a = now_ms();
    let b = now_ms();
    assert!(a > 0);
    assert!(b >= a);
}

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
    assert!(DEFAULT_LOG_FILTER.starts_with("slot_booker"));
}

//! Binding and registration metrics.
//!
//! Recorded through the `metrics` facade. Nothing is exported unless the
//! application installs a recorder.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `heron_registrations_total` | Counter | `outcome` | Controller registrations |
//! | `heron_bindings_total` | Counter | `outcome` | Argument binding attempts |
//! | `heron_invocations_total` | Counter | `operation`, `status` | Handler invocations |
//! | `heron_invocation_duration_seconds` | Histogram | `operation` | Handler latency |

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Duration;

/// Registrations counter name.
pub const REGISTRATIONS_TOTAL: &str = "heron_registrations_total";

/// Binding attempts counter name.
pub const BINDINGS_TOTAL: &str = "heron_bindings_total";

/// Handler invocations counter name.
pub const INVOCATIONS_TOTAL: &str = "heron_invocations_total";

/// Handler latency histogram name.
pub const INVOCATION_DURATION_SECONDS: &str = "heron_invocation_duration_seconds";

/// Registers descriptions for all Heron metrics with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(
        REGISTRATIONS_TOTAL,
        "Controller registrations by outcome"
    );
    describe_counter!(
        BINDINGS_TOTAL,
        "Argument binding attempts by outcome (success or error code)"
    );
    describe_counter!(INVOCATIONS_TOTAL, "Handler invocations by status");
    describe_histogram!(
        INVOCATION_DURATION_SECONDS,
        "Handler duration in seconds"
    );
}

/// Records a controller registration.
///
/// `outcome` is `"success"` or `"failure"`.
pub fn record_registration(outcome: &'static str) {
    counter!(REGISTRATIONS_TOTAL, "outcome" => outcome).increment(1);
}

/// Records one binding attempt.
///
/// `outcome` is `"success"` or the binding error code.
pub fn record_binding(outcome: &'static str) {
    counter!(BINDINGS_TOTAL, "outcome" => outcome).increment(1);
}

/// Records a completed handler invocation.
///
/// # Arguments
///
/// * `operation` - The operation key, e.g. `GET [id]`
/// * `status_code` - HTTP status of the response or error
/// * `duration` - Time spent in the handler
pub fn record_invocation(operation: &str, status_code: u16, duration: Duration) {
    counter!(
        INVOCATIONS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);

    histogram!(
        INVOCATION_DURATION_SECONDS,
        "operation" => operation.to_string()
    )
    .record(duration.as_secs_f64());
}

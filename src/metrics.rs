use anyhow::Result;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics exporter
pub fn init_metrics() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "qpu_billing_requests_total",
        "Total number of API requests"
    );
    describe_counter!(
        "qpu_billing_fees_total",
        "Total number of fee computations by event kind"
    );
    describe_counter!(
        "qpu_billing_fee_cents_total",
        "Sum of computed fee amounts in cents by event kind"
    );
    describe_histogram!(
        "qpu_billing_request_duration_seconds",
        "Request duration in seconds"
    );
    describe_counter!(
        "qpu_billing_errors_total",
        "Total number of errors"
    );
    describe_gauge!(
        "qpu_billing_info",
        "Service version and build information"
    );

    gauge!("qpu_billing_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a request
pub fn record_request(endpoint: &str) {
    counter!(
        "qpu_billing_requests_total",
        "endpoint" => endpoint.to_string(),
    )
    .increment(1);
}

/// Record a computed fee
pub fn record_fee(event_kind: &'static str, amount: f64) {
    counter!("qpu_billing_fees_total", "event" => event_kind).increment(1);
    counter!("qpu_billing_fee_cents_total", "event" => event_kind)
        .increment((amount * 100.0).round().max(0.0) as u64);
}

/// Record request duration
pub fn record_duration(endpoint: &str, duration: Duration) {
    histogram!(
        "qpu_billing_request_duration_seconds",
        "endpoint" => endpoint.to_string(),
    )
    .record(duration.as_secs_f64());
}

/// Record an error
pub fn record_error(error_type: &'static str) {
    counter!("qpu_billing_errors_total", "error_type" => error_type).increment(1);
}

use error_stack::ResultExt;
use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

// Define latency buckets for histograms
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

lazy_static! {
    pub static ref EXTERNAL_SERVICE_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "external_service_total_api_calls",
        "Total number of external service API calls",
        &["method", "service", "connector"]
    )
    .expect("Failed to register external_service_total_api_calls");

    pub static ref EXTERNAL_SERVICE_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "external_service_api_calls_latency",
        "Latency of external service API calls in seconds",
        &["method", "service", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("Failed to register external_service_api_calls_latency");

    pub static ref EXTERNAL_SERVICE_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "external_service_api_calls_errors",
        "Total number of errors in external service API calls",
        &["method", "service", "connector", "status_code"]
    )
    .expect("Failed to register external_service_api_calls_errors");
}

/// Renders every registered metric in the Prometheus text format.
pub fn metrics_handler() -> error_stack::Result<String, MetricsError> {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .change_context(MetricsError::EncodingError)?;
    String::from_utf8(buffer).change_context(MetricsError::Utf8Error)
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Error encoding metrics")]
    EncodingError,
    #[error("Error converting metrics to utf8")]
    Utf8Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_metrics_are_rendered() {
        EXTERNAL_SERVICE_TOTAL_API_CALLS
            .with_label_values(&["POST", "metrics_test", "securepay"])
            .inc();
        let rendered = metrics_handler().unwrap();
        assert!(rendered.contains("external_service_total_api_calls"));
    }
}

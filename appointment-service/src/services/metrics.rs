//! Metrics collection for appointment-service.
//!
//! HTTP request metrics come from the `metrics` recorder; submission outcomes
//! are a Prometheus counter appended to the same exposition.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use prometheus::{IntCounterVec, Opts, Registry};
use std::sync::OnceLock;

pub static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();
pub static PROMETHEUS_REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static APPOINTMENT_SUBMISSIONS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Created,
    Invalid,
    Failed,
}

impl SubmissionOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionOutcome::Created => "created",
            SubmissionOutcome::Invalid => "invalid",
            SubmissionOutcome::Failed => "failed",
        }
    }
}

/// Initialize metrics collection. Call once, before the server starts.
pub fn init_metrics() -> anyhow::Result<()> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("failed to install Prometheus recorder: {}", e))?;

    METRICS_HANDLE
        .set(handle)
        .map_err(|_| anyhow::anyhow!("metrics handle already initialized"))?;

    let registry = Registry::new();

    let submissions_counter = IntCounterVec::new(
        Opts::new(
            "appointment_submissions_total",
            "Total appointment submissions by outcome",
        ),
        &["outcome"],
    )?;

    registry.register(Box::new(submissions_counter.clone()))?;

    PROMETHEUS_REGISTRY
        .set(registry)
        .map_err(|_| anyhow::anyhow!("prometheus registry already initialized"))?;
    APPOINTMENT_SUBMISSIONS_TOTAL
        .set(submissions_counter)
        .map_err(|_| anyhow::anyhow!("appointment_submissions_total already initialized"))?;

    Ok(())
}

/// Get metrics output in Prometheus text format.
pub fn get_metrics() -> String {
    let mut output = METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized\n".to_string());

    if let Some(registry) = PROMETHEUS_REGISTRY.get() {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let metric_families = registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer).ok();
        if let Ok(custom_metrics) = String::from_utf8(buffer) {
            output.push_str(&custom_metrics);
        }
    }

    output
}

/// Count one submission. No-op until [`init_metrics`] has run.
pub fn record_submission(outcome: SubmissionOutcome) {
    if let Some(counter) = APPOINTMENT_SUBMISSIONS_TOTAL.get() {
        counter.with_label_values(&[outcome.as_str()]).inc();
    }
}

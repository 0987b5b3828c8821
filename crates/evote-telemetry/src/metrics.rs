//! Prometheus metrics for the e-voting program.
//!
//! All metrics follow the naming convention: `evote_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{Counter, CounterVec, Encoder, Opts, Registry, TextEncoder};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Proposals committed by `create`
    pub static ref PROPOSALS_CREATED: Counter = Counter::new(
        "evote_program_proposals_created_total",
        "Total number of proposals created"
    ).expect("metric creation failed");

    /// Votes committed, labelled by choice
    pub static ref VOTES_CAST: CounterVec = CounterVec::new(
        Opts::new("evote_program_votes_cast_total", "Total votes cast"),
        &["choice"]  // yes/no
    ).expect("metric creation failed");

    /// Transitions rejected, labelled by error code
    pub static ref TRANSITIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("evote_program_transitions_rejected_total", "Total rejected transitions"),
        &["instruction", "code"]
    ).expect("metric creation failed");
}

/// Handle returned once metrics are registered.
pub struct MetricsHandle {
    _registry: Arc<Registry>,
}

/// Register all metrics with the global registry.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(PROPOSALS_CREATED.clone()),
        Box::new(VOTES_CAST.clone()),
        Box::new(TRANSITIONS_REJECTED.clone()),
    ];

    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle {
        _registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Record a committed proposal.
pub fn record_proposal_created() {
    PROPOSALS_CREATED.inc();
}

/// Record a committed vote.
pub fn record_vote_cast(choice: &str) {
    VOTES_CAST.with_label_values(&[choice]).inc();
}

/// Record a rejected transition.
pub fn record_rejection(instruction: &str, code: &str) {
    TRANSITIONS_REJECTED
        .with_label_values(&[instruction, code])
        .inc();
}

//! Metrics recording implementation using Prometheus.

use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Trait for recording application metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one form submission with its outcome label.
    fn record_form_submission(&self, form: &str, outcome: &str);

    /// Records how long a form submission took end to end.
    fn record_form_duration(&self, form: &str, duration_secs: f64);

    /// Records a route guard decision for a classified path.
    fn record_guard_decision(&self, class: &str, decision: &str);
}

/// Prometheus metrics collector.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    // Form metrics
    form_submissions_total: CounterVec,
    form_submission_duration_seconds: HistogramVec,

    // Guard metrics
    route_guard_decisions_total: CounterVec,
}

impl Metrics {
    /// Creates a new metrics instance with a Prometheus registry.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let form_submissions_total = register_counter_vec_with_registry!(
            Opts::new("form_submissions_total", "Total number of form submissions"),
            &["form", "outcome"],
            registry.clone()
        )
        .expect("Failed to register form_submissions_total");

        let form_submission_duration_seconds = register_histogram_vec_with_registry!(
            "form_submission_duration_seconds",
            "Form submission duration in seconds, including the identity provider call",
            &["form"],
            vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0],
            registry.clone()
        )
        .expect("Failed to register form_submission_duration_seconds");

        let route_guard_decisions_total = register_counter_vec_with_registry!(
            Opts::new(
                "route_guard_decisions_total",
                "Route guard decisions per route class"
            ),
            &["class", "decision"],
            registry.clone()
        )
        .expect("Failed to register route_guard_decisions_total");

        Metrics {
            registry,
            form_submissions_total,
            form_submission_duration_seconds,
            route_guard_decisions_total,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return String::new();
        }
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_form_submission(&self, form: &str, outcome: &str) {
        self.form_submissions_total
            .with_label_values(&[form, outcome])
            .inc();
    }

    fn record_form_duration(&self, form: &str, duration_secs: f64) {
        self.form_submission_duration_seconds
            .with_label_values(&[form])
            .observe(duration_secs);
    }

    fn record_guard_decision(&self, class: &str, decision: &str) {
        self.route_guard_decisions_total
            .with_label_values(&[class, decision])
            .inc();
    }
}

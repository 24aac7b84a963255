//! Metrics collection and exposition for Prometheus.
//!
//! Counts form submissions and route guard decisions.

mod recorder;

pub use recorder::{Metrics, MetricsRecorder};

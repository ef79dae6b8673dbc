//! Metrics collection, per-task aggregation, and histogram utilities.
mod collector;
mod histogram;
mod types;

#[cfg(test)]
mod tests;

pub use collector::setup_metrics_collector;
pub use histogram::LatencyHistogram;
pub use types::{MetricsReport, RequestOutcome, TaskMetric, TaskSummary};

#[cfg(test)]
pub(crate) use collector::{TaskStats, run_deadline};

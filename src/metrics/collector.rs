use std::collections::BTreeMap;
use std::time::Duration;

use tokio::{
    sync::mpsc,
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::info;

use crate::shutdown::ShutdownSender;
use crate::user::TaskKind;

use super::{LatencyHistogram, MetricsReport, TaskMetric, TaskSummary};

/// How often a running total is logged while the swarm is active.
const STATUS_INTERVAL: Duration = Duration::from_secs(10);
/// Upper bound on waiting for late metrics after shutdown.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(2);
/// Roughly thirty years; used when `run_start + run_time` does not fit.
const FAR_FUTURE: Duration = Duration::from_secs(946_080_000);

/// Counters for one request name.
#[derive(Debug, Clone)]
pub(crate) struct TaskStats {
    requests: u64,
    failures: u64,
    timeouts: u64,
    transport_errors: u64,
    status_counts: BTreeMap<u16, u64>,
    min_latency_ms: u64,
    max_latency_ms: u64,
    latency_sum_ms: u128,
    response_bytes: u64,
    histogram: LatencyHistogram,
}

impl TaskStats {
    pub(crate) fn new() -> Result<Self, String> {
        Ok(Self {
            requests: 0,
            failures: 0,
            timeouts: 0,
            transport_errors: 0,
            status_counts: BTreeMap::new(),
            min_latency_ms: u64::MAX,
            max_latency_ms: 0,
            latency_sum_ms: 0,
            response_bytes: 0,
            histogram: LatencyHistogram::new()?,
        })
    }

    pub(crate) fn record(&mut self, metric: &TaskMetric) -> Result<(), String> {
        let latency_ms = metric.latency_ms();
        let outcome = metric.outcome;
        self.requests = self.requests.saturating_add(1);
        if !outcome.success {
            self.failures = self.failures.saturating_add(1);
        }
        if outcome.timed_out {
            self.timeouts = self.timeouts.saturating_add(1);
        }
        if outcome.transport_error {
            self.transport_errors = self.transport_errors.saturating_add(1);
        }
        let count = self.status_counts.entry(outcome.status).or_insert(0);
        *count = count.saturating_add(1);
        self.min_latency_ms = self.min_latency_ms.min(latency_ms);
        self.max_latency_ms = self.max_latency_ms.max(latency_ms);
        self.latency_sum_ms = self.latency_sum_ms.saturating_add(u128::from(latency_ms));
        self.response_bytes = self.response_bytes.saturating_add(outcome.response_bytes);
        self.histogram.record(latency_ms)
    }

    pub(crate) const fn requests(&self) -> u64 {
        self.requests
    }

    pub(crate) const fn failures(&self) -> u64 {
        self.failures
    }

    pub(crate) fn summarize(&self, name: &str, duration: Duration) -> TaskSummary {
        let avg_latency_ms = self
            .latency_sum_ms
            .checked_div(u128::from(self.requests))
            .and_then(|avg| u64::try_from(avg).ok())
            .unwrap_or(0);
        let duration_ms = duration.as_millis().max(1);
        let avg_rps_x100 = u128::from(self.requests)
            .saturating_mul(100_000)
            .checked_div(duration_ms)
            .map_or(0, |scaled| u64::try_from(scaled).unwrap_or(u64::MAX));
        let (p50, p90, p99) = self.histogram.percentiles();

        TaskSummary {
            name: name.to_owned(),
            requests: self.requests,
            failures: self.failures,
            timeouts: self.timeouts,
            transport_errors: self.transport_errors,
            status_counts: self.status_counts.clone(),
            min_latency_ms: if self.requests == 0 {
                0
            } else {
                self.min_latency_ms
            },
            max_latency_ms: self.max_latency_ms,
            avg_latency_ms,
            p50_latency_ms: p50,
            p90_latency_ms: p90,
            p99_latency_ms: p99,
            response_bytes: self.response_bytes,
            avg_rps_x100,
        }
    }
}

struct CollectorState {
    per_task: BTreeMap<TaskKind, TaskStats>,
    total: TaskStats,
}

impl CollectorState {
    fn new() -> Result<Self, String> {
        let mut per_task = BTreeMap::new();
        for kind in TaskKind::ALL {
            per_task.insert(kind, TaskStats::new()?);
        }
        Ok(Self {
            per_task,
            total: TaskStats::new()?,
        })
    }

    fn record(&mut self, metric: &TaskMetric) -> Result<(), String> {
        if let Some(stats) = self.per_task.get_mut(&metric.task) {
            stats.record(metric)?;
        }
        self.total.record(metric)
    }

    fn into_report(self, duration: Duration) -> MetricsReport {
        let tasks = self
            .per_task
            .iter()
            .map(|(kind, stats)| stats.summarize(kind.label(), duration))
            .collect();
        MetricsReport {
            duration,
            tasks,
            total: self.total.summarize("Aggregated", duration),
        }
    }
}

/// When the run-time timer fires. Durations too large for the clock run
/// until some other shutdown source ends the run.
#[must_use]
pub(crate) fn run_deadline(run_start: Instant, run_time: Duration) -> Instant {
    run_start
        .checked_add(run_time)
        .or_else(|| run_start.checked_add(FAR_FUTURE))
        .unwrap_or(run_start)
}

/// Spawns the collector. It stops the run once `run_time` has elapsed and
/// returns the aggregated report when the run is over.
#[must_use]
pub fn setup_metrics_collector(
    run_time: Duration,
    run_start: Instant,
    shutdown_tx: &ShutdownSender,
    mut metrics_rx: mpsc::Receiver<TaskMetric>,
) -> JoinHandle<Result<MetricsReport, String>> {
    let shutdown_tx = shutdown_tx.clone();
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut state = CollectorState::new()?;
        let mut status_interval = tokio::time::interval_at(
            run_start.checked_add(STATUS_INTERVAL).unwrap_or(run_start),
            STATUS_INTERVAL,
        );
        status_interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let shutdown_timer = tokio::time::sleep_until(run_deadline(run_start, run_time));
        tokio::pin!(shutdown_timer);

        loop {
            tokio::select! {
                () = &mut shutdown_timer => {
                    info!("Run time of {:?} elapsed, stopping users.", run_time);
                    drop(shutdown_tx.send(()));
                    break;
                },
                _ = shutdown_rx.recv() => break,
                maybe_msg = metrics_rx.recv() => {
                    let Some(metric) = maybe_msg else {
                        drop(shutdown_tx.send(()));
                        break;
                    };
                    state.record(&metric)?;
                },
                _ = status_interval.tick() => {
                    info!(
                        elapsed_s = run_start.elapsed().as_secs(),
                        requests = state.total.requests(),
                        failures = state.total.failures(),
                        "Swarm progress"
                    );
                },
            }
        }

        // Users finishing their last request still report it; the channel
        // closes once every user has exited.
        let drain_deadline = Instant::now()
            .checked_add(DRAIN_TIMEOUT)
            .unwrap_or_else(Instant::now);
        while let Ok(Some(metric)) =
            tokio::time::timeout_at(drain_deadline, metrics_rx.recv()).await
        {
            state.record(&metric)?;
        }

        Ok(state.into_report(run_start.elapsed()))
    })
}

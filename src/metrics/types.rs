use std::collections::BTreeMap;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::user::TaskKind;

/// Status recorded when no HTTP response was received.
pub const NO_RESPONSE_STATUS: u16 = 0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RequestOutcome {
    pub status: u16,
    pub success: bool,
    pub timed_out: bool,
    pub transport_error: bool,
    pub response_bytes: u64,
}

impl RequestOutcome {
    /// Responses below 400 count as successes.
    #[must_use]
    pub const fn from_status(status: u16, response_bytes: u64) -> Self {
        Self {
            status,
            success: status < 400,
            timed_out: false,
            transport_error: false,
            response_bytes,
        }
    }

    #[must_use]
    pub const fn failed(timed_out: bool) -> Self {
        Self {
            status: NO_RESPONSE_STATUS,
            success: false,
            timed_out,
            transport_error: !timed_out,
            response_bytes: 0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct TaskMetric {
    pub task: TaskKind,
    pub response_time: Duration,
    pub outcome: RequestOutcome,
}

impl TaskMetric {
    #[must_use]
    pub fn new(task: TaskKind, start: Instant, outcome: RequestOutcome) -> Self {
        Self {
            task,
            response_time: start.elapsed(),
            outcome,
        }
    }

    #[must_use]
    pub fn latency_ms(&self) -> u64 {
        u64::try_from(self.response_time.as_millis()).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct TaskSummary {
    pub name: String,
    pub requests: u64,
    pub failures: u64,
    pub timeouts: u64,
    pub transport_errors: u64,
    pub status_counts: BTreeMap<u16, u64>,
    pub min_latency_ms: u64,
    pub max_latency_ms: u64,
    pub avg_latency_ms: u64,
    pub p50_latency_ms: u64,
    pub p90_latency_ms: u64,
    pub p99_latency_ms: u64,
    pub response_bytes: u64,
    pub avg_rps_x100: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    #[serde(rename = "duration_ms", serialize_with = "serialize_duration_ms")]
    pub duration: Duration,
    pub tasks: Vec<TaskSummary>,
    pub total: TaskSummary,
}

fn serialize_duration_ms<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_u64(u64::try_from(duration.as_millis()).unwrap_or(u64::MAX))
}

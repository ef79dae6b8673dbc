use crate::metrics::{MetricsReport, TaskSummary};

const PERCENT_DIVISOR: u64 = 100;

fn header_line() -> String {
    format!(
        "{:<20} {:>8} {:>15} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>9}",
        "Name", "# reqs", "# fails", "Avg", "Min", "Max", "p50", "p90", "p99", "req/s"
    )
}

fn fraction_x100(value: u64) -> String {
    format!(
        "{}.{:02}",
        value / PERCENT_DIVISOR,
        value % PERCENT_DIVISOR
    )
}

fn failure_rate_x100(summary: &TaskSummary) -> u64 {
    u128::from(summary.failures)
        .saturating_mul(10_000)
        .checked_div(u128::from(summary.requests))
        .map_or(0, |scaled| u64::try_from(scaled).unwrap_or(u64::MAX))
}

fn task_line(summary: &TaskSummary) -> String {
    format!(
        "{:<20} {:>8} {:>15} {:>8} {:>8} {:>8} {:>8} {:>8} {:>8} {:>9}",
        summary.name,
        summary.requests,
        format!(
            "{}({}%)",
            summary.failures,
            fraction_x100(failure_rate_x100(summary))
        ),
        summary.avg_latency_ms,
        summary.min_latency_ms,
        summary.max_latency_ms,
        summary.p50_latency_ms,
        summary.p90_latency_ms,
        summary.p99_latency_ms,
        fraction_x100(summary.avg_rps_x100)
    )
}

fn status_line(summary: &TaskSummary) -> Option<String> {
    if summary.status_counts.is_empty() {
        return None;
    }
    let counts: Vec<String> = summary
        .status_counts
        .iter()
        .map(|(status, count)| {
            if *status == 0 {
                format!("no response={}", count)
            } else {
                format!("{}={}", status, count)
            }
        })
        .collect();
    Some(format!("  {}: {}", summary.name, counts.join(", ")))
}

/// Renders the end-of-run table. Latencies are in milliseconds.
pub(crate) fn summary_lines(report: &MetricsReport) -> Vec<String> {
    let mut lines = Vec::new();
    let separator = "-".repeat(header_line().len());

    lines.push(header_line());
    lines.push(separator.clone());
    for task in &report.tasks {
        lines.push(task_line(task));
    }
    lines.push(separator);
    lines.push(task_line(&report.total));
    lines.push(String::new());

    let status_lines: Vec<String> = report.tasks.iter().filter_map(status_line).collect();
    if !status_lines.is_empty() {
        lines.push("Status codes:".to_owned());
        lines.extend(status_lines);
    }
    lines.push(format!(
        "Duration: {}.{:03}s",
        report.duration.as_secs(),
        report.duration.subsec_millis()
    ));
    lines
}

pub(crate) fn print_summary(report: &MetricsReport) {
    for line in summary_lines(report) {
        println!("{}", line);
    }
}

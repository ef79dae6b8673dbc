use super::*;
use crate::shutdown::shutdown_channel;
use crate::user::TaskKind;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

fn run_async_test<F>(future: F) -> Result<(), String>
where
    F: Future<Output = Result<(), String>>,
{
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime.block_on(future)
}

fn metric(task: TaskKind, latency_ms: u64, outcome: RequestOutcome) -> TaskMetric {
    TaskMetric {
        task,
        response_time: Duration::from_millis(latency_ms),
        outcome,
    }
}

#[test]
fn request_outcome_classifies_status() -> Result<(), String> {
    let checks = [
        (RequestOutcome::from_status(200, 10).success, "200 is a success"),
        (RequestOutcome::from_status(201, 10).success, "201 is a success"),
        (!RequestOutcome::from_status(404, 0).success, "404 is a failure"),
        (!RequestOutcome::from_status(500, 0).success, "500 is a failure"),
        (RequestOutcome::failed(true).timed_out, "timeouts are flagged"),
        (
            RequestOutcome::failed(false).transport_error,
            "transport errors are flagged",
        ),
        (
            RequestOutcome::failed(false).status == 0,
            "missing responses use status 0",
        ),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(format!("Expected {}", message));
        }
    }
    Ok(())
}

#[test]
fn task_stats_summarize_latencies_and_statuses() -> Result<(), String> {
    let mut stats = TaskStats::new()?;
    for (latency, status) in [(10, 200), (20, 200), (30, 404), (40, 200)] {
        stats.record(&metric(
            TaskKind::GetAlbum,
            latency,
            RequestOutcome::from_status(status, 64),
        ))?;
    }
    stats.record(&metric(TaskKind::GetAlbum, 5, RequestOutcome::failed(true)))?;

    let summary = stats.summarize("GET /albums/{id}", Duration::from_secs(2));
    let checks = [
        (summary.requests == 5, "requests"),
        (summary.failures == 2, "failures"),
        (summary.timeouts == 1, "timeouts"),
        (summary.transport_errors == 0, "transport errors"),
        (summary.status_counts.get(&200) == Some(&3), "200 count"),
        (summary.status_counts.get(&404) == Some(&1), "404 count"),
        (summary.status_counts.get(&0) == Some(&1), "no-response count"),
        (summary.min_latency_ms == 5, "min latency"),
        (summary.max_latency_ms == 40, "max latency"),
        (summary.avg_latency_ms == 21, "avg latency"),
        (summary.response_bytes == 256, "response bytes"),
        (summary.avg_rps_x100 == 250, "rps"),
    ];
    for (ok, field) in checks {
        if !ok {
            return Err(format!("Unexpected {}: {:?}", field, summary));
        }
    }
    Ok(())
}

#[test]
fn empty_stats_report_zeroes() -> Result<(), String> {
    let stats = TaskStats::new()?;
    let summary = stats.summarize("POST /albums", Duration::from_secs(1));
    if summary.requests != 0 || summary.min_latency_ms != 0 || summary.p99_latency_ms != 0 {
        return Err(format!("Expected zeroed summary: {:?}", summary));
    }
    Ok(())
}

#[test]
fn collector_reports_per_task_when_channel_closes() -> Result<(), String> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let (metrics_tx, metrics_rx) = mpsc::channel(16);
        let handle = setup_metrics_collector(
            Duration::from_secs(30),
            Instant::now(),
            &shutdown_tx,
            metrics_rx,
        );

        let sent = [
            (TaskKind::ListAlbums, 200),
            (TaskKind::ListAlbums, 200),
            (TaskKind::GetAlbum, 404),
            (TaskKind::CreateAlbum, 201),
        ];
        for (task, status) in sent {
            metrics_tx
                .send(metric(task, 3, RequestOutcome::from_status(status, 0)))
                .await
                .map_err(|err| format!("send failed: {}", err))?;
        }
        drop(metrics_tx);

        let report = handle
            .await
            .map_err(|err| format!("collector join failed: {}", err))??;
        if report.total.requests != 4 || report.total.failures != 1 {
            return Err(format!("Unexpected totals: {:?}", report.total));
        }
        let names: Vec<&str> = report.tasks.iter().map(|task| task.name.as_str()).collect();
        if names != ["GET /albums", "GET /albums/{id}", "POST /albums"] {
            return Err(format!("Unexpected task order: {:?}", names));
        }
        let list = report
            .tasks
            .first()
            .ok_or_else(|| "Missing list summary".to_owned())?;
        if list.requests != 2 {
            return Err(format!("Unexpected list requests: {}", list.requests));
        }
        Ok(())
    })
}

#[test]
fn collector_stops_run_after_run_time() -> Result<(), String> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let mut observer = shutdown_tx.subscribe();
        let (metrics_tx, metrics_rx) = mpsc::channel::<TaskMetric>(4);
        let handle = setup_metrics_collector(
            Duration::from_millis(50),
            Instant::now(),
            &shutdown_tx,
            metrics_rx,
        );

        tokio::time::timeout(Duration::from_secs(2), observer.recv())
            .await
            .map_err(|_elapsed| "Expected shutdown after run time".to_owned())?
            .map_err(|err| format!("shutdown recv failed: {}", err))?;
        drop(metrics_tx);

        let report = handle
            .await
            .map_err(|err| format!("collector join failed: {}", err))??;
        if report.total.requests != 0 {
            return Err("Expected no requests".to_owned());
        }
        Ok(())
    })
}

#[test]
fn collector_sees_shutdown_sent_before_it_runs() -> Result<(), String> {
    run_async_test(async {
        let (shutdown_tx, _) = shutdown_channel();
        let (metrics_tx, metrics_rx) = mpsc::channel::<TaskMetric>(4);
        let handle = setup_metrics_collector(
            Duration::from_secs(3600),
            Instant::now(),
            &shutdown_tx,
            metrics_rx,
        );
        shutdown_tx
            .send(())
            .map_err(|err| format!("shutdown send failed: {}", err))?;
        drop(metrics_tx);

        let report = tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .map_err(|_elapsed| "Collector missed the early shutdown".to_owned())?
            .map_err(|err| format!("collector join failed: {}", err))??;
        if report.total.requests != 0 {
            return Err("Expected no requests".to_owned());
        }
        Ok(())
    })
}

#[test]
fn oversized_run_time_is_a_far_deadline() -> Result<(), String> {
    run_async_test(async {
        let now = Instant::now();
        let deadline = run_deadline(now, Duration::MAX);
        let ahead = deadline.saturating_duration_since(now);
        if ahead < Duration::from_secs(86_400 * 365) {
            return Err(format!("Deadline too close: {:?}", ahead));
        }
        let regular = run_deadline(now, Duration::from_secs(5));
        if regular.saturating_duration_since(now) != Duration::from_secs(5) {
            return Err("Regular run time should be kept as is".to_owned());
        }
        Ok(())
    })
}

#[test]
fn report_serializes_duration_in_ms() -> Result<(), String> {
    let report = MetricsReport {
        duration: Duration::from_millis(1500),
        tasks: vec![],
        total: TaskSummary::default(),
    };
    let value = serde_json::to_value(&report).map_err(|err| format!("encode failed: {}", err))?;
    if value.get("duration_ms") != Some(&serde_json::json!(1500)) {
        return Err(format!("Unexpected report JSON: {}", value));
    }
    Ok(())
}

use chrono::Utc;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use crate::{
    args::TesterArgs,
    error::AppResult,
    http::{self, AlbumsEndpoint, SwarmSettings},
    metrics::{self, MetricsReport, TaskMetric, TaskSummary},
    shutdown::{setup_signal_shutdown_handler, shutdown_channel},
    user::UserBehavior,
};

use super::{export, summary};

/// Metrics buffered between users and the collector.
const METRICS_CHANNEL_CAPACITY: usize = 10_000;

pub(crate) struct RunOutcome {
    pub report: MetricsReport,
    pub runtime_errors: Vec<String>,
}

/// Runs the swarm to completion, prints the summary and writes the optional
/// JSON export.
///
/// # Errors
///
/// Returns an error when the host or the HTTP client cannot be set up.
/// Failures after the swarm has started end up in `runtime_errors`.
pub(crate) async fn run_local(args: &TesterArgs, behavior: UserBehavior) -> AppResult<RunOutcome> {
    let endpoint = AlbumsEndpoint::parse(&args.host)?;
    let client = http::build_client(args)?;
    let started_at = Utc::now();

    let (shutdown_tx, _) = shutdown_channel();
    let (metrics_tx, metrics_rx) = mpsc::channel::<TaskMetric>(METRICS_CHANNEL_CAPACITY);

    info!(
        host = %endpoint.collection(),
        users = args.users.get(),
        spawn_rate = args.spawn_rate.get(),
        profile = behavior.profile().as_str(),
        "Starting swarm for {:?}",
        args.run_time
    );

    let run_start = Instant::now();
    let swarm_handle = http::setup_swarm(
        SwarmSettings::from_args(args),
        client,
        endpoint,
        behavior,
        &shutdown_tx,
        &metrics_tx,
    );
    drop(metrics_tx);

    let signal_shutdown_handle = setup_signal_shutdown_handler(&shutdown_tx);
    let metrics_handle =
        metrics::setup_metrics_collector(args.run_time, run_start, &shutdown_tx, metrics_rx);
    let (signal_result, metrics_result, swarm_result) =
        tokio::join!(signal_shutdown_handle, metrics_handle, swarm_handle);

    let mut runtime_errors = Vec::new();
    if let Err(err) = signal_result {
        runtime_errors.push(format!("Signal handler task failed: {}", err));
    }
    match swarm_result {
        Ok(errors) => runtime_errors.extend(errors),
        Err(err) => runtime_errors.push(format!("Swarm task failed: {}", err)),
    }

    let report = match metrics_result {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => {
            runtime_errors.push(format!("Metrics collector failed: {}", err));
            empty_report(run_start)
        }
        Err(err) => {
            runtime_errors.push(format!("Metrics collector task failed: {}", err));
            empty_report(run_start)
        }
    };

    summary::print_summary(&report);

    if let Some(path) = args.export_json.as_deref() {
        let context = export::ExportContext { started_at, args };
        match export::export_json(path, &context, &report).await {
            Ok(()) => info!("Report written to {}", path),
            Err(err) => runtime_errors.push(format!("Failed to export JSON: {}", err)),
        }
    }

    Ok(RunOutcome {
        report,
        runtime_errors,
    })
}

fn empty_report(run_start: Instant) -> MetricsReport {
    MetricsReport {
        duration: run_start.elapsed(),
        tasks: Vec::new(),
        total: TaskSummary::default(),
    }
}

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::io::{AsyncWriteExt, BufWriter};

use crate::{args::TesterArgs, metrics::MetricsReport};

/// Run parameters written next to the report.
pub(crate) struct ExportContext<'run> {
    pub(crate) started_at: DateTime<Utc>,
    pub(crate) args: &'run TesterArgs,
}

pub(crate) fn export_payload(
    context: &ExportContext<'_>,
    report: &MetricsReport,
) -> Result<serde_json::Value, serde_json::Error> {
    let args = context.args;
    Ok(serde_json::json!({
        "started_at": context.started_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        "host": args.host,
        "profile": args.profile.as_str(),
        "users": args.users.get(),
        "spawn_rate": args.spawn_rate.get(),
        "report": serde_json::to_value(report)?,
    }))
}

pub(crate) async fn export_json(
    path: &str,
    context: &ExportContext<'_>,
    report: &MetricsReport,
) -> Result<(), std::io::Error> {
    let payload = export_payload(context, report).map_err(std::io::Error::other)?;
    let file = tokio::fs::File::create(path).await?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_vec_pretty(&payload).map_err(std::io::Error::other)?;
    writer.write_all(&json).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

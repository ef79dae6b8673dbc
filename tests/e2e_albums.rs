
use std::fs;
use std::path::Path;

use tempfile::tempdir;

use support_albums::{run_albums_load, spawn_albums_server_or_skip};

fn failure_output(output: &std::process::Output) -> String {
    format!(
        "stdout: {}\nstderr: {}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

fn read_export(path: &Path) -> Result<serde_json::Value, String> {
    let content =
        fs::read_to_string(path).map_err(|err| format!("read export failed: {}", err))?;
    serde_json::from_str(&content).map_err(|err| format!("parse export failed: {}", err))
}

fn task_requests(export: &serde_json::Value, name: &str) -> Result<u64, String> {
    export
        .pointer("/report/tasks")
        .and_then(serde_json::Value::as_array)
        .and_then(|tasks| {
            tasks
                .iter()
                .find(|task| task.get("name").and_then(serde_json::Value::as_str) == Some(name))
        })
        .and_then(|task| task.get("requests"))
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| format!("Missing task '{}' in export: {}", name, export))
}

fn total(export: &serde_json::Value, field: &str) -> Result<u64, String> {
    export
        .pointer(&format!("/report/total/{}", field))
        .and_then(serde_json::Value::as_u64)
        .ok_or_else(|| format!("Missing total {} in export: {}", field, export))
}

#[test]
fn e2e_standard_profile_honors_request_cap() -> Result<(), String> {
    let Some((url, server)) = spawn_albums_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let export_path = dir.path().join("report.json");

    let args = vec![
        "--host".to_owned(),
        url,
        "-u".to_owned(),
        "1".to_owned(),
        "-t".to_owned(),
        "30s".to_owned(),
        "--requests".to_owned(),
        "40".to_owned(),
        "--wait-min".to_owned(),
        "0s".to_owned(),
        "--wait-max".to_owned(),
        "0s".to_owned(),
        "--seed".to_owned(),
        "11".to_owned(),
        "--export-json".to_owned(),
        export_path.to_string_lossy().into_owned(),
    ];

    let output = run_albums_load(args)?;
    if !output.status.success() {
        return Err(failure_output(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("Aggregated") {
        return Err(format!("Missing summary table: {}", failure_output(&output)));
    }

    let export = read_export(&export_path)?;
    if total(&export, "requests")? != 40 {
        return Err(format!("Expected 40 requests: {}", export));
    }
    if total(&export, "failures")? != 0 {
        return Err(format!("Expected no failures: {}", export));
    }
    let per_task: u64 = ["GET /albums", "GET /albums/{id}", "POST /albums"]
        .iter()
        .map(|name| task_requests(&export, name))
        .sum::<Result<u64, String>>()?;
    if per_task != 40 {
        return Err(format!("Per-task counts do not add up: {}", export));
    }
    if server.requests() != 40 {
        return Err(format!("Server saw {} requests", server.requests()));
    }
    Ok(())
}

#[test]
fn e2e_config_file_drives_the_run() -> Result<(), String> {
    let Some((url, _server)) = spawn_albums_server_or_skip()? else {
        return Ok(());
    };
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let export_path = dir.path().join("report.json");
    let config_path = dir.path().join("albums-load.toml");
    let config = format!(
        r#"host = "{}"
requests = 5
profile = "simple"
export_json = "{}"

[wait]
min = "0s"
max = "10ms"

[tasks]
list_albums = 0
get_album = 0
create_album = 1
"#,
        url,
        export_path.to_string_lossy().replace('\\', "\\\\")
    );
    fs::write(&config_path, config).map_err(|err| format!("write config failed: {}", err))?;

    let output = run_albums_load([
        "--config".to_owned(),
        config_path.to_string_lossy().into_owned(),
    ])?;
    if !output.status.success() {
        return Err(failure_output(&output));
    }

    let export = read_export(&export_path)?;
    if export.get("profile").and_then(serde_json::Value::as_str) != Some("simple") {
        return Err(format!("Expected the simple profile: {}", export));
    }
    if task_requests(&export, "POST /albums")? != 5
        || task_requests(&export, "GET /albums")? != 0
        || task_requests(&export, "GET /albums/{id}")? != 0
    {
        return Err(format!("Expected only POST requests: {}", export));
    }
    let created = export
        .pointer("/report/tasks")
        .and_then(serde_json::Value::as_array)
        .and_then(|tasks| {
            tasks.iter().find(|task| {
                task.get("name").and_then(serde_json::Value::as_str) == Some("POST /albums")
            })
        })
        .and_then(|task| task.pointer("/status_counts/201"))
        .and_then(serde_json::Value::as_u64);
    if created != Some(5) {
        return Err(format!("Expected five 201 responses: {}", export));
    }
    Ok(())
}

#[test]
fn e2e_duration_ends_the_run() -> Result<(), String> {
    let Some((url, _server)) = spawn_albums_server_or_skip()? else {
        return Ok(());
    };

    let output = run_albums_load([
        "--host",
        url.as_str(),
        "-u",
        "2",
        "-r",
        "2",
        "-t",
        "1500ms",
        "--profile",
        "fast",
    ])?;
    if !output.status.success() {
        return Err(failure_output(&output));
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.contains("POST /albums") || !stdout.contains("Duration: ") {
        return Err(format!("Unexpected summary: {}", failure_output(&output)));
    }
    Ok(())
}

#[test]
fn e2e_rejects_non_http_host() -> Result<(), String> {
    let output = run_albums_load(["--host", "ftp://localhost:21", "-t", "1s"])?;
    if output.status.success() {
        return Err(format!("Expected failure: {}", failure_output(&output)));
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.contains("UnsupportedScheme") {
        return Err(format!("Unexpected error: {}", failure_output(&output)));
    }
    Ok(())
}

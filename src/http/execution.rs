use futures_util::StreamExt;
use reqwest::{Client, Request, StatusCode, header::CONTENT_TYPE};
use tracing::{info, warn};

use crate::albums::AlbumView;
use crate::error::HttpError;
use crate::metrics::RequestOutcome;
use crate::user::{TaskAction, TaskKind};

use super::AlbumsEndpoint;

/// A log line produced while inspecting a response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Info(String),
    Warn(String),
}

impl Observation {
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Observation::Info(message) | Observation::Warn(message) => message,
        }
    }

    pub fn emit(&self, task: TaskKind, status: u16) {
        match self {
            Observation::Info(message) => info!(task = task.label(), status, "{}", message),
            Observation::Warn(message) => warn!(task = task.label(), status, "{}", message),
        }
    }
}

/// Result of one task request: what the metrics see plus what the user logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub request: RequestOutcome,
    pub detail: Option<Observation>,
}

impl TaskOutcome {
    fn transport_failure(action: &TaskAction, err: &reqwest::Error) -> Self {
        Self {
            request: RequestOutcome::failed(err.is_timeout()),
            detail: Some(Observation::Warn(format!(
                "{} request failed: {}",
                request_line(action),
                err
            ))),
        }
    }
}

/// Sends the request for `action`. With `inspect` set the body is parsed and
/// an observation is attached; otherwise the body is only drained so the
/// connection goes back to the pool.
///
/// Transport errors and timeouts are reported through the outcome, not as
/// `Err`.
///
/// # Errors
///
/// Returns an error only when the request itself cannot be built.
pub async fn execute_action(
    client: &Client,
    endpoint: &AlbumsEndpoint,
    action: &TaskAction,
    inspect: bool,
) -> Result<TaskOutcome, HttpError> {
    let request = build_request(client, endpoint, action)?;
    let response = match client.execute(request).await {
        Ok(response) => response,
        Err(err) => return Ok(TaskOutcome::transport_failure(action, &err)),
    };
    let status = response.status();

    if !inspect {
        return Ok(match drain_response_body(response).await {
            Ok(bytes) => TaskOutcome {
                request: RequestOutcome::from_status(status.as_u16(), bytes),
                detail: None,
            },
            Err(err) => TaskOutcome::transport_failure(action, &err),
        });
    }

    let body = match read_response_body(response).await {
        Ok(body) => body,
        Err(err) => return Ok(TaskOutcome::transport_failure(action, &err)),
    };
    let mut request =
        RequestOutcome::from_status(status.as_u16(), u64::try_from(body.len()).unwrap_or(u64::MAX));
    let detail = match observe(action, status, &body) {
        Ok(detail) => detail,
        Err(err) => {
            request.success = false;
            Some(Observation::Warn(format!(
                "{} returned an unreadable body: {}",
                request_line(action),
                err
            )))
        }
    };
    Ok(TaskOutcome { request, detail })
}

fn build_request(
    client: &Client,
    endpoint: &AlbumsEndpoint,
    action: &TaskAction,
) -> Result<Request, HttpError> {
    let builder = match action {
        TaskAction::ListAlbums => client.get(endpoint.collection().clone()),
        TaskAction::GetAlbum { id } => client.get(endpoint.item(id)?),
        TaskAction::CreateAlbum { album } => {
            let body = serde_json::to_vec(album).map_err(|source| HttpError::EncodeBody { source })?;
            client
                .post(endpoint.collection().clone())
                .header(CONTENT_TYPE, "application/json")
                .body(body)
        }
    };
    builder
        .build()
        .map_err(|source| HttpError::BuildRequestFailed { source })
}

/// Turns an inspected response into the line the standard profile logs.
pub(super) fn observe(
    action: &TaskAction,
    status: StatusCode,
    body: &[u8],
) -> Result<Option<Observation>, serde_json::Error> {
    match action {
        TaskAction::ListAlbums => {
            if status != StatusCode::OK {
                return Ok(None);
            }
            let albums: Vec<serde_json::Value> = serde_json::from_slice(body)?;
            Ok(Some(Observation::Info(format!(
                "GET /albums returned {} albums",
                albums.len()
            ))))
        }
        TaskAction::GetAlbum { id } => {
            if status == StatusCode::OK {
                let album: AlbumView = serde_json::from_slice(body)?;
                return Ok(Some(Observation::Info(format!(
                    "GET /albums/{} found: {}",
                    id,
                    album.display_title()
                ))));
            }
            if status == StatusCode::NOT_FOUND {
                return Ok(Some(Observation::Info(format!(
                    "GET /albums/{} not found (expected)",
                    id
                ))));
            }
            Ok(None)
        }
        TaskAction::CreateAlbum { .. } => {
            if status != StatusCode::CREATED {
                return Ok(Some(Observation::Warn(format!(
                    "POST /albums failed with status: {}",
                    status.as_u16()
                ))));
            }
            let created: AlbumView = serde_json::from_slice(body)?;
            Ok(Some(Observation::Info(format!(
                "POST /albums created: {}",
                created.display_title()
            ))))
        }
    }
}

fn request_line(action: &TaskAction) -> String {
    match action {
        TaskAction::GetAlbum { id } => format!("GET /albums/{}", id),
        TaskAction::ListAlbums | TaskAction::CreateAlbum { .. } => action.kind().label().to_owned(),
    }
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}

async fn read_response_body(response: reqwest::Response) -> Result<Vec<u8>, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut body = Vec::new();
    while let Some(chunk) = stream.next().await {
        body.extend_from_slice(&chunk?);
    }
    Ok(body)
}

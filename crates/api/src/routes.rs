use std::sync::Arc;

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_LENGTH;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use ingest::{Chunk, ChunkParams, IngestError, UploadSink, process_content};

use crate::state::AppState;

// ── Response shaping ─────────────────────────────────────────────

/// Failure response carrying a stable signal string. I/O detail never leaks
/// to the caller; it is logged server-side instead.
pub struct ApiError {
    status: StatusCode,
    signal: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "signal": self.signal }));
        (self.status, body).into_response()
    }
}

fn bad_request(signal: impl Into<String>) -> ApiError {
    ApiError {
        status: StatusCode::BAD_REQUEST,
        signal: signal.into(),
    }
}

fn upload_failed() -> ApiError {
    bad_request("File upload failed")
}

fn processing_failed() -> ApiError {
    bad_request("Processing failed")
}

#[derive(Serialize)]
pub struct AppInfo {
    pub app_name: String,
    pub app_version: String,
}

#[derive(Serialize)]
pub struct UploadResponse {
    pub signal: String,
    pub file_id: String,
}

#[derive(Deserialize)]
pub struct ProcessRequest {
    pub file_id: String,
    #[serde(flatten)]
    pub params: ChunkParams,
}

// ── Handlers ─────────────────────────────────────────────────────

/// GET / -- service identity.
pub async fn base(State(state): State<Arc<AppState>>) -> Json<AppInfo> {
    Json(AppInfo {
        app_name: state.config.app_name.clone(),
        app_version: state.config.app_version.clone(),
    })
}

/// POST /upload/:project_id -- multipart upload of a single `file` field.
///
/// Validates the descriptor, then streams the body to disk under a freshly
/// generated file id. The id is only returned once the write has finished;
/// a failed write discards the partial file.
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    loop {
        let mut field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(%project_id, error = %e, "malformed multipart upload");
                return Err(upload_failed());
            }
        };
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let declared_size = field
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok());

        state
            .policy
            .validate(&file_name, declared_size)
            .map_err(|e| bad_request(e.to_string()))?;

        let file_id = state.ids.generate(&file_name);
        let mut sink = state
            .store
            .create_sink(&project_id, &file_id)
            .await
            .map_err(|e| {
                error!(%project_id, %file_id, error = %e, "failed to open upload sink");
                upload_failed()
            })?;

        let mut written = 0u64;
        loop {
            let piece = match field.chunk().await {
                Ok(Some(piece)) => piece,
                Ok(None) => break,
                Err(e) => {
                    error!(%project_id, %file_id, error = %e, "error while reading upload");
                    discard_partial(&state, &project_id, &file_id).await;
                    return Err(upload_failed());
                }
            };
            written += piece.len() as u64;
            if written > state.policy.max_size_bytes {
                discard_partial(&state, &project_id, &file_id).await;
                return Err(bad_request(
                    IngestError::FileTooLarge {
                        size: written,
                        max: state.policy.max_size_bytes,
                    }
                    .to_string(),
                ));
            }
            if let Err(e) = sink.write_chunk(&piece).await {
                error!(%project_id, %file_id, error = %e, "error while writing upload");
                discard_partial(&state, &project_id, &file_id).await;
                return Err(upload_failed());
            }
        }
        if let Err(e) = sink.finish().await {
            error!(%project_id, %file_id, error = %e, "error while finishing upload");
            discard_partial(&state, &project_id, &file_id).await;
            return Err(upload_failed());
        }

        info!(%project_id, %file_id, bytes = written, "file uploaded");
        return Ok(Json(UploadResponse {
            signal: "File uploaded".to_string(),
            file_id,
        }));
    }

    warn!(%project_id, "upload request without a file field");
    Err(upload_failed())
}

/// POST /process/:project_id -- chunk a stored file's content.
///
/// Degenerate results (zero or one chunk) and unreadable files both come
/// back as the generic processing failure; the distinction is logged.
pub async fn process(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    Json(request): Json<ProcessRequest>,
) -> Result<Json<Vec<Chunk>>, ApiError> {
    let content = state
        .store
        .read_content(&project_id, &request.file_id)
        .await
        .map_err(|e| {
            error!(%project_id, file_id = %request.file_id, error = %e, "failed to read stored file");
            processing_failed()
        })?;

    let chunks = process_content(&request.file_id, &content, request.params).map_err(|e| {
        info!(%project_id, file_id = %request.file_id, reason = %e, "processing rejected");
        processing_failed()
    })?;

    info!(
        %project_id,
        file_id = %request.file_id,
        chunks = chunks.len(),
        "file processed"
    );
    Ok(Json(chunks))
}

async fn discard_partial(state: &AppState, project_id: &str, file_id: &str) {
    // A partial file must never be referenced by a returned id; removal
    // failure only matters for disk hygiene.
    if let Err(e) = state.store.discard(project_id, file_id).await {
        warn!(%project_id, %file_id, error = %e, "could not remove partial upload");
    }
}

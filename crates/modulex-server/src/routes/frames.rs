use axum::{
    body::Bytes,
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use modulex_core::frames::FrameKind;
use modulex_core::plans;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /image: save a frame and start the scene-analysis run.
pub async fn upload_image(
    State(app): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filename = receive(&app, FrameKind::Image, multipart).await?;
    app.dispatcher.launch(plans::image_plan());

    Ok(Json(serde_json::json!({
        "status": "received",
        "filename": filename,
        "message": "Image processing started",
    })))
}

/// POST /video: save a recording. Superseded by /image; no run is started.
pub async fn upload_video(
    State(app): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let filename = receive(&app, FrameKind::Video, multipart).await?;

    Ok(Json(serde_json::json!({
        "status": "received",
        "filename": filename,
        "message": "Video received",
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Oversized bodies are 413; any other malformed multipart input is 400.
fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large(e.body_text())
    } else {
        AppError::bad_request(e.body_text())
    }
}

struct Upload {
    payload: Option<Bytes>,
    timestamp: Option<String>,
}

/// Pull the file part named after `kind` and the optional `timestamp` field.
/// Only parts that carry a filename count as the file.
async fn read_upload(mut multipart: Multipart, kind: FrameKind) -> Result<Upload, AppError> {
    let mut upload = Upload {
        payload: None,
        timestamp: None,
    };

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().map(str::to_owned);
        let is_file = field.file_name().is_some();
        match name.as_deref() {
            Some(n) if n == kind.field() && is_file => {
                upload.payload = Some(field.bytes().await.map_err(multipart_error)?);
            }
            Some("timestamp") => {
                upload.timestamp = Some(field.text().await.map_err(multipart_error)?);
            }
            _ => {}
        }
    }

    Ok(upload)
}

/// Validate, persist and count one upload; returns the generated filename.
async fn receive(
    app: &AppState,
    kind: FrameKind,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<String, AppError> {
    let missing = || AppError::bad_request(format!("No {} file provided", kind.field()));

    let multipart = multipart.map_err(|_| missing())?;
    let Upload { payload, timestamp } = read_upload(multipart, kind).await?;
    let payload = payload.ok_or_else(missing)?;

    let frames = app.frames.clone();
    let frame = tokio::task::spawn_blocking(move || {
        frames.save(kind, &payload, timestamp, chrono::Utc::now())
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    let received = app.store.record_frame(kind);
    info!(
        kind = kind.field(),
        filename = %frame.filename,
        timestamp = frame.timestamp.as_deref().unwrap_or("none"),
        received,
        "frame stored"
    );

    Ok(frame.filename)
}

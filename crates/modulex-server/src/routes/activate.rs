use axum::{extract::rejection::JsonRejection, extract::State, Json};
use modulex_core::plans;
use modulex_core::store::Annotation;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActivateBody {
    /// Absent and `null` are both treated as an empty batch.
    #[serde(default)]
    pub annotations: Option<Vec<Annotation>>,
}

/// POST /activate: store an annotation batch and start the guidance run.
///
/// Returns as soon as the batch is recorded; the callback and the
/// turn-by-turn instructions follow in the background.
pub async fn activate(
    State(app): State<AppState>,
    body: Result<Json<ActivateBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let annotations = body.annotations.unwrap_or_default();
    let count = annotations.len();

    info!(count, "module activated");
    debug!(?annotations, "annotations received");

    let total = app.store.record_annotations(annotations);
    debug!(total, "annotation store updated");

    // Separate runs: the callback never holds up the instructions.
    app.dispatcher.launch(plans::annotation_callback(count));
    app.dispatcher.launch(plans::annotation_plan());

    Ok(Json(serde_json::json!({
        "status": "activated",
        "annotations_received": count,
        "message": "Module X is processing your request",
    })))
}

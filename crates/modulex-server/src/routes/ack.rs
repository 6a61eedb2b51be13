use axum::{extract::rejection::JsonRejection, extract::State, Json};
use modulex_core::plans::ACK_INSTRUCTION;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AckBody {
    #[serde(default)]
    pub goal_id: Option<serde_json::Value>,
    #[serde(default)]
    pub ack: Option<serde_json::Value>,
}

/// POST /ack: log a client acknowledgment and confirm it on the signaling
/// endpoint before replying. Missing fields are reported as `null`.
pub async fn acknowledge(
    State(app): State<AppState>,
    body: Result<Json<AckBody>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let Json(body) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let goal_id = body.goal_id.unwrap_or(serde_json::Value::Null);
    let ack = body.ack.unwrap_or(serde_json::Value::Null);

    info!(%goal_id, %ack, "acknowledgment received");

    let delivery = app.dispatcher.notifier().instruct(ACK_INSTRUCTION).await;
    if !delivery.is_sent() {
        warn!(%goal_id, "acknowledgment confirmation was not delivered");
    }

    Ok(Json(serde_json::json!({
        "status": "acknowledged",
        "goal_id": goal_id,
    })))
}

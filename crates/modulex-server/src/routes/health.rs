use axum::{extract::State, Json};
use modulex_core::store::Health;

use crate::state::AppState;

/// GET /health: annotation and frame counters, no side effects
pub async fn health(State(app): State<AppState>) -> Json<Health> {
    Json(app.store.health())
}

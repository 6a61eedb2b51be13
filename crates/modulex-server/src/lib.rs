pub mod error;
pub mod routes;
pub mod state;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Largest accepted request body; frames and recordings go through multipart.
pub const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Build the axum Router with all routes and middleware.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Submissions
        .route("/activate", post(routes::activate::activate))
        .route("/image", post(routes::frames::upload_image))
        .route("/video", post(routes::frames::upload_video))
        .route("/ack", post(routes::ack::acknowledge))
        // Health
        .route("/health", get(routes::health::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve on a pre-bound listener until the future completes.
///
/// Creates `images/` and `videos/` under the storage root first.
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    app_state.frames.ensure_layout()?;
    let addr = listener.local_addr()?;
    let app = build_router(app_state);

    tracing::info!("modulex listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

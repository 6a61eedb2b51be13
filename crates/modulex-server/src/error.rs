use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use modulex_core::error::ModuleError;

// ---------------------------------------------------------------------------
// Internal sentinel for explicit 413 Payload Too Large errors
// ---------------------------------------------------------------------------

/// Carries an upload that exceeded the body limit through the `anyhow::Error`
/// chain without widening `ModuleError`.
#[derive(Debug)]
struct PayloadTooLargeError(String);

impl std::fmt::Display for PayloadTooLargeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for PayloadTooLargeError {}

// ---------------------------------------------------------------------------
// AppError
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. The body is always `{"error": ...}`.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    /// Construct a 400 Bad Request error with the given message.
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self(ModuleError::Validation(msg.into()).into())
    }

    /// Construct a 413 Payload Too Large error.
    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self(PayloadTooLargeError(msg.into()).into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(p) = self.0.downcast_ref::<PayloadTooLargeError>() {
            let body = serde_json::json!({ "error": p.0.clone() });
            return (StatusCode::PAYLOAD_TOO_LARGE, axum::Json(body)).into_response();
        }

        let status = match self.0.downcast_ref::<ModuleError>() {
            Some(ModuleError::Validation(_) | ModuleError::InvalidSignalingUrl(_)) => {
                StatusCode::BAD_REQUEST
            }
            Some(
                ModuleError::Io(_)
                | ModuleError::Yaml(_)
                | ModuleError::Json(_)
                | ModuleError::Http(_),
            )
            | None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use seonoc_common::NocError;

/// HTTP mapping for the domain error taxonomy. Client-class errors carry
/// their message verbatim; internal errors are logged and masked.
pub struct ApiError(pub NocError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<NocError> for ApiError {
    fn from(e: NocError) -> Self {
        Self(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self(NocError::Internal(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            NocError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
            NocError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            NocError::Authorization(m) => (StatusCode::FORBIDDEN, m.clone()),
            NocError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            NocError::External(m) => (StatusCode::BAD_GATEWAY, m.clone()),
            NocError::Internal(e) => {
                error!(error = %e, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

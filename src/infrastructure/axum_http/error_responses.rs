use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

use crate::application::errors::CoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            CoreError::NotAuthorized(_) => (StatusCode::FORBIDDEN, self.to_string()),
            CoreError::InvalidState(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            CoreError::QuotaExceeded(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            CoreError::Validation(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            CoreError::EngineFailure(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            CoreError::Internal(err) => {
                // Don't leak internal error detail to client
                error!(error = ?err, "internal error reached the http layer");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            code: status.as_u16(),
            message,
        });

        (status, body).into_response()
    }
}

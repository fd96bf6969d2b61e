use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use bellwether_shared::ApiMessage;
use thiserror::Error;

use crate::store::StoreError;

/// Handler failures. Rendered as `{"message": ...}` with the matching status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    BadRequest(String),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Storage paths stay in the log, not in the response.
            Self::Store(e) => {
                tracing::error!(error = %e, "data store failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ApiMessage { message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::Unauthorized("Invalid password").status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn message_is_the_display_text() {
        assert_eq!(
            ApiError::Unauthorized("Invalid password").to_string(),
            "Invalid password"
        );
    }
}

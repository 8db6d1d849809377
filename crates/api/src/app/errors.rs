use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::error;

use guardpost_core::{AuthError, ErrorKind};

/// Handler error: an [`AuthError`] rendered as `{ "error", "message" }`.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorKind::Forbidden => StatusCode::FORBIDDEN,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        if kind == ErrorKind::Internal {
            // Infrastructure detail stays in the logs.
            error!(error = %self.0, "request failed");
            return json_error(status_for(kind), kind.code(), "Internal server error");
        }
        json_error(status_for(kind), kind.code(), self.0.message())
    }
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_kind_has_its_status() {
        assert_eq!(status_for(AuthError::unauthorized("x").kind()), StatusCode::UNAUTHORIZED);
        assert_eq!(status_for(AuthError::forbidden("x").kind()), StatusCode::FORBIDDEN);
        assert_eq!(status_for(AuthError::conflict("x").kind()), StatusCode::CONFLICT);
        assert_eq!(status_for(AuthError::not_found("x").kind()), StatusCode::NOT_FOUND);
        assert_eq!(status_for(AuthError::validation("x").kind()), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(AuthError::internal("x").kind()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn internal_errors_hide_their_detail() {
        let response = ApiError(AuthError::internal("pool timed out")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}

use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::borrow::Cow;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("template error: {0}")]
    Render(#[from] askama::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

/// Maps a unique-constraint violation to a conflict the caller can surface,
/// and leaves every other database failure untouched.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> ApiError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            ApiError::Conflict(message.to_string())
        }
        _ => ApiError::Database(err),
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    code: &'static str,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let code = self.code();

        error!(code, status = %status, error = %self, "api_error");

        let body = Json(ErrorResponse {
            code,
            message: self.public_message().into_owned(),
        });

        (status, body).into_response()
    }
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_failed",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Database(_) => "database_error",
            ApiError::Migrate(_) => "migration_error",
            ApiError::Render(_) => "render_error",
            ApiError::Io(_) => "io_error",
        }
    }

    fn public_message(&self) -> Cow<'static, str> {
        match self {
            ApiError::Validation(msg) => Cow::Owned(msg.clone()),
            ApiError::NotFound(msg) => Cow::Owned(msg.clone()),
            ApiError::Conflict(msg) => Cow::Owned(msg.clone()),
            ApiError::Database(_)
            | ApiError::Migrate(_)
            | ApiError::Render(_)
            | ApiError::Io(_) => Cow::Borrowed("internal server error"),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Database(_)
            | ApiError::Migrate(_)
            | ApiError::Render(_)
            | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;

    #[tokio::test]
    async fn validation_error_is_a_bad_request_with_its_message() {
        let response = ApiError::Validation("score must be between 0 and 10".into()).into_response();

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::BAD_REQUEST);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "validation_failed");
        assert_eq!(json["message"], "score must be between 0 and 10");
    }

    #[tokio::test]
    async fn database_error_hides_the_underlying_message() {
        let response = ApiError::Database(sqlx::Error::PoolTimedOut).into_response();

        let (parts, body) = response.into_parts();
        assert_eq!(parts.status, StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = body.collect().await.unwrap().to_bytes();
        let json: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "database_error");
        assert_eq!(json["message"], "internal server error");
    }

    #[tokio::test]
    async fn not_found_keeps_the_entity_reference() {
        let response = ApiError::NotFound("ranking 42 not found".into()).into_response();

        let (parts, _) = response.into_parts();
        assert_eq!(parts.status, StatusCode::NOT_FOUND);
    }
}

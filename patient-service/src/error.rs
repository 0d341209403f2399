/*
 * Responsibility
 * - service-wide AppError definition
 * - IntoResponse (HTTP status / JSON error body)
 * - repo errors are converted here
 * - event publishing failures never reach this type (they are logged only)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn email_already_exists(email: &str) -> Self {
        Self::bad_request(
            "EMAIL_ALREADY_EXISTS",
            format!("A patient with this email already exists: {email}"),
        )
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => AppError::bad_request(
                "EMAIL_ALREADY_EXISTS",
                "A patient with this email already exists",
            ),
            RepoError::Db(_) => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn json_of(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn duplicate_email_is_a_400_with_code() {
        let response = AppError::email_already_exists("jane@example.com").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_of(response).await;
        assert_eq!(body["error"]["code"], "EMAIL_ALREADY_EXISTS");
        assert_eq!(
            body["error"]["message"],
            "A patient with this email already exists: jane@example.com"
        );
    }

    #[tokio::test]
    async fn unique_violation_maps_to_the_same_code() {
        let response = AppError::from(RepoError::Conflict).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_of(response).await["error"]["code"], "EMAIL_ALREADY_EXISTS");
    }

    #[tokio::test]
    async fn db_failure_hides_details() {
        let response = AppError::from(RepoError::Db(sqlx::Error::PoolTimedOut)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_of(response).await["error"]["code"], "INTERNAL_SERVER_ERROR");
    }
}

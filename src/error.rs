/*
 * Responsibility
 * - gateway-wide AppError definition
 * - IntoResponse (HTTP status / JSON error body)
 * - credential failures are NOT here: they always answer 401 with an empty body
 *   (see services::auth::AuthRejection)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::proxy::ProxyError;

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
    #[error("no route for {path}")]
    NotFound { path: String },
    #[error("request body too large")]
    PayloadTooLarge,
    #[error("upstream unavailable")]
    BadGateway,
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
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::NotFound { path } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("no route for {path}"),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
            ),
            AppError::BadGateway => (
                StatusCode::BAD_GATEWAY,
                "BAD_GATEWAY",
                "upstream unavailable".into(),
            ),
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

impl From<ProxyError> for AppError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::RequestBody(_) => {
                AppError::bad_request("INVALID_BODY", "request body could not be read")
            }
            ProxyError::BodyTooLarge => AppError::PayloadTooLarge,
            ProxyError::Upstream(_) | ProxyError::UpstreamBody(_) => AppError::BadGateway,
            ProxyError::BuildResponse(_) => AppError::Internal,
        }
    }
}

/*
 * Responsibility
 * - the API-wide AppError
 * - IntoResponse: HTTP status + the shared JSON error envelope
 * - conversions from service errors (issuance / lookup) and body rejections
 * - unexpected failures become a generic 500; details only go to the log
 */
use std::collections::BTreeMap;

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::services::auth::{IssueError, LookupError};

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<FieldErrors>,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("input validation failed")]
    Validation(FieldErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, message, validation_errors) = match self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "Validation Failed",
                "Input validation failed".to_string(),
                Some(fields),
            ),
            AppError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, "Bad Request", message, None)
            }
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Authentication required".to_string(),
                None,
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Unauthorized",
                "Invalid email or password".to_string(),
                None,
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                "Not Found",
                format!("{resource} not found"),
                None,
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An unexpected error occurred".to_string(),
                None,
            ),
        };

        let body = ErrorResponse {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error,
            message,
            validation_errors,
        };

        (status, Json(body)).into_response()
    }
}

impl From<IssueError> for AppError {
    fn from(e: IssueError) -> Self {
        match e {
            IssueError::Duplicate => AppError::bad_request("Email already registered"),
            IssueError::InvalidCredentials => AppError::InvalidCredentials,
            IssueError::Token(_) | IssueError::Store(_) | IssueError::Hash(_) => {
                error!(error = %e, "credential issuance failed");
                AppError::Internal
            }
        }
    }
}

impl From<LookupError> for AppError {
    fn from(e: LookupError) -> Self {
        match e {
            LookupError::NotFound => AppError::NotFound("user"),
            LookupError::Store(err) => {
                error!(error = %err, "identity lookup failed");
                AppError::Internal
            }
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection, "rejected request body");
        AppError::bad_request("Malformed request body")
    }
}

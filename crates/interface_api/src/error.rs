//! API error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use domain_loan::LoanError;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Missing required documents")]
    MissingDocuments(Vec<String>),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error")]
    Validation(Vec<String>),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::MissingDocuments(missing) => (
                StatusCode::BAD_REQUEST,
                "missing_documents",
                format!("Missing required documents: {}", missing.join(", ")),
                Some(missing),
            ),
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "unauthorized",
                "Unauthorized".to_string(),
                None,
            ),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg, None),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg, None),
            ApiError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg, None)
            }
            ApiError::Database(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", msg, None)
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "validation_error",
                "Validation failed".to_string(),
                Some(errors),
            ),
        };

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Maps the domain error taxonomy onto HTTP responses
///
/// Internal detail never crosses the boundary: storage failures surface as a
/// generic retryable message.
impl From<LoanError> for ApiError {
    fn from(error: LoanError) -> Self {
        match error {
            LoanError::UnknownLoanType(loan_type) => {
                ApiError::BadRequest(format!("Unknown loan type: {loan_type}"))
            }
            LoanError::MissingDocuments { missing } => ApiError::MissingDocuments(missing),
            LoanError::Validation { errors } => ApiError::Validation(errors),
            LoanError::Unauthorized => {
                ApiError::Forbidden("You are not allowed to perform this operation".to_string())
            }
            LoanError::InvalidTransition { from, to } => {
                ApiError::BadRequest(format!("Invalid status transition from {from} to {to}"))
            }
            LoanError::AlreadyFinalized { status } => {
                ApiError::Conflict(format!("Application already finalized as {status}"))
            }
            LoanError::Storage(port_error) => {
                if port_error.is_not_found() {
                    ApiError::NotFound("Application not found".to_string())
                } else {
                    tracing::error!(error = %port_error, "Storage failure");
                    ApiError::Database("Temporary storage failure, please try again".to_string())
                }
            }
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError::Database(err.to_string())
    }
}

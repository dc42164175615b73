use axum::response::{IntoResponse, Response};
use axum::Json;
use diesel::r2d2;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Debug)]
pub enum ApiError {
    Database(DieselError),
    DatabaseConnection(String),
    Validation(validator::ValidationErrors),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Callback(String),
    GatewayRejected { code: String, details: String },
    Payment(String),
    Internal(String),
}

/// Failures talking to the Daraja API.
#[derive(Debug, thiserror::Error)]
pub enum MpesaError {
    #[error("M-Pesa request failed: {0}")]
    RequestFailed(String),

    #[error("M-Pesa API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("M-Pesa returned an unreadable response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            ApiError::Database(DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation,
                _
            ))
        )
    }

    fn details(&self) -> Option<String> {
        match self {
            ApiError::GatewayRejected { details, .. } => Some(details.clone()),
            ApiError::Payment(msg) => Some(msg.clone()),
            _ => None,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Database(e) => write!(f, "Database error: {}", e),
            ApiError::DatabaseConnection(e) => write!(f, "Database connection error: {}", e),
            ApiError::Validation(e) => write!(f, "Validation error: {}", e),
            ApiError::BadRequest(e) => write!(f, "Bad request: {}", e),
            ApiError::NotFound(e) => write!(f, "Not found: {}", e),
            ApiError::Conflict(e) => write!(f, "Conflict: {}", e),
            ApiError::Callback(e) => write!(f, "Malformed callback: {}", e),
            ApiError::GatewayRejected { code, details } => {
                write!(f, "Gateway rejected request (code {}): {}", code, details)
            }
            ApiError::Payment(e) => write!(f, "Payment error: {}", e),
            ApiError::Internal(e) => write!(f, "Internal error: {}", e),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            ApiError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<r2d2::Error> for ApiError {
    fn from(err: r2d2::Error) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<r2d2::PoolError> for ApiError {
    fn from(err: r2d2::PoolError) -> Self {
        ApiError::DatabaseConnection(err.to_string())
    }
}

impl From<DieselError> for ApiError {
    fn from(err: DieselError) -> Self {
        ApiError::Database(err)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Payment(err.to_string())
    }
}

impl From<MpesaError> for ApiError {
    fn from(err: MpesaError) -> Self {
        ApiError::Payment(err.to_string())
    }
}

impl From<ApiError> for (StatusCode, String) {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Database(e) => match e {
                DieselError::NotFound => (StatusCode::NOT_FOUND, "Record not found".to_string()),
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    (StatusCode::CONFLICT, format!("Database error: {}", e))
                }
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => (
                    StatusCode::BAD_REQUEST,
                    format!("Database error: {}", e),
                ),
                _ => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", e),
                ),
            },
            ApiError::DatabaseConnection(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database connection error: {}", e),
            ),
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                format!("Validation error: {}", errors),
            ),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Callback(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed callback: {}", msg),
            ),
            ApiError::GatewayRejected { .. } => (
                StatusCode::BAD_REQUEST,
                "STK Push request denied by M-Pesa.".to_string(),
            ),
            ApiError::Payment(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Payment initiation failed".to_string(),
            ),
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal error: {}", msg),
            ),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if matches!(
            self,
            ApiError::Database(_)
                | ApiError::DatabaseConnection(_)
                | ApiError::Payment(_)
                | ApiError::Internal(_)
        ) {
            tracing::error!(error = %self, "Request failed");
        }

        let details = self.details();
        let (status, error): (StatusCode, String) = self.into();
        (status, Json(ApiErrorResponse { error, details })).into_response()
    }
}

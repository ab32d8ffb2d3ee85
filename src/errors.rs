use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{error, warn};
use utoipa::ToSchema;

fn current_request_id() -> Option<String> {
    crate::tracing::current_request_id().map(|rid| rid.as_str().to_string())
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "error": "Not Found",
    "message": "Company sadlsa does not exist",
    "status": 404,
    "kind": "not_found",
    "request_id": "5f0c6d1e-3d65-4a44-9f1a-6f4f8f0b2a11",
    "timestamp": "2024-12-09T10:30:00.000Z"
}))]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Internal Server Error")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Numeric HTTP status code
    pub status: u16,
    /// Machine-readable error kind
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Classification of a statement the store refused to execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    UniqueViolation,
    ForeignKeyViolation,
    InvalidInput,
    Connection,
    Other,
}

impl StoreErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UniqueViolation => "unique_violation",
            Self::ForeignKeyViolation => "foreign_key_violation",
            Self::InvalidInput => "invalid_input",
            Self::Connection => "connection",
            Self::Other => "other",
        }
    }

    /// Maps a driver error onto a kind. Constraint violations are recognised
    /// through sea-orm's portable `SqlErr`, the rest by `DbErr` variant.
    pub fn classify(err: &DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => return Self::UniqueViolation,
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => return Self::ForeignKeyViolation,
            _ => {}
        }

        match err {
            DbErr::Conn(_) | DbErr::ConnectionAcquire(_) => Self::Connection,
            DbErr::Type(_) | DbErr::Json(_) | DbErr::TryIntoErr { .. } => Self::InvalidInput,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("Store rejected statement ({kind}): {source}")]
    StoreRejected {
        kind: StoreErrorKind,
        #[source]
        source: DbErr,
    },

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        ServiceError::StoreRejected {
            kind: StoreErrorKind::classify(&err),
            source: err,
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StoreRejected { .. } | Self::MalformedBody(_) | Self::ValidationError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::StoreRejected { kind, .. } => kind.as_str(),
            Self::MalformedBody(_) | Self::ValidationError(_) => "invalid_input",
            Self::ServiceUnavailable(_) => "unavailable",
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Driver messages stay in the logs.
    pub fn response_message(&self) -> String {
        match self {
            Self::StoreRejected { kind, .. } => match kind {
                StoreErrorKind::UniqueViolation => "Record already exists".to_string(),
                StoreErrorKind::ForeignKeyViolation => {
                    "Referenced record does not exist".to_string()
                }
                StoreErrorKind::InvalidInput => "Invalid value for column".to_string(),
                StoreErrorKind::Connection => "Database unavailable".to_string(),
                StoreErrorKind::Other => "Database error".to_string(),
            },
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(kind = self.kind(), error = %self, "Request failed");
        } else {
            warn!(kind = self.kind(), error = %self, "Request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            status: status.as_u16(),
            kind: self.kind().to_string(),
            request_id: current_request_id(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

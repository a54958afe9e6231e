use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Standard API error response structure
///
/// Every failure leaves the server in this one envelope shape; the
/// success envelope is [`ApiResponse`]. Internal detail for 500s goes to
/// the log, never into the body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Always `false` for errors
    pub success: bool,
    /// Error payload
    pub error: ApiErrorDetail,
}

/// Error payload carried inside the envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Unique error ID for tracking
    pub error_id: String,
    /// Error type
    pub error_type: String,
    /// Stable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Field-specific validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_errors: Option<HashMap<String, Vec<String>>>,
    /// Timestamp when error occurred
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Standard API success response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ResponseMetadata>,
}

/// Response metadata for pagination, etc.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResponseMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PaginationInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PaginationInfo {
    pub page: i32,
    pub page_size: i32,
    pub total_pages: i32,
    pub has_next: bool,
    pub has_previous: bool,
}

/// Main API error enum
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        field_errors: Option<HashMap<String, Vec<String>>>,
    },

    #[error("Resource not found: {resource_type}")]
    NotFound { resource_type: String },

    #[error("Database error: {0}")]
    Database(#[from] database_layer::DatabaseError),

    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },
}

impl ApiError {
    /// Create a simple validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: None,
        }
    }

    /// Create a validation error with field-specific errors
    pub fn validation_with_fields(
        message: impl Into<String>,
        field_errors: HashMap<String, Vec<String>>,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field_errors: Some(field_errors),
        }
    }

    /// Create a not found error
    pub fn not_found(resource_type: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    /// Get the error type string
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "validation_error",
            ApiError::NotFound { .. } => "not_found",
            ApiError::Database(_) => "database_error",
            ApiError::Internal { .. } => "internal_error",
            ApiError::BadRequest { .. } => "bad_request",
        }
    }

    /// Stable error code for client-side handling
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => error_common::codes::validation::MISSING_REQUIRED_FIELD,
            ApiError::NotFound { .. } => error_common::codes::resource::NOT_FOUND,
            ApiError::Database(db_err) => {
                if db_err.is_constraint_violation() {
                    error_common::codes::database::CONSTRAINT_VIOLATION
                } else if matches!(db_err, database_layer::DatabaseError::ConnectionFailed(_)) {
                    error_common::codes::database::CONNECTION_FAILED
                } else {
                    error_common::codes::database::QUERY_FAILED
                }
            }
            ApiError::Internal { .. } => error_common::codes::system::INTERNAL_ERROR,
            ApiError::BadRequest { .. } => error_common::codes::validation::INVALID_FORMAT,
        }
    }

    /// Message exposed to the client
    ///
    /// Storage and internal failures collapse to a generic message; the
    /// specifics are logged server-side only.
    fn client_message(&self) -> String {
        match self {
            ApiError::Database(_) | ApiError::Internal { .. } => "Server error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4().to_string();
        let status_code = self.status_code();

        // Log the error with correlation ID
        error!(
            error_id = %error_id,
            error_type = %self.error_type(),
            status_code = %status_code.as_u16(),
            error = %self,
            "API error occurred"
        );

        let field_errors = match &self {
            ApiError::Validation { field_errors, .. } => field_errors.clone(),
            _ => None,
        };

        let error_response = ApiErrorResponse {
            success: false,
            error: ApiErrorDetail {
                error_id,
                error_type: self.error_type().to_string(),
                code: self.code().to_string(),
                message: self.client_message(),
                field_errors,
                timestamp: chrono::Utc::now(),
            },
        };

        (status_code, Json(error_response)).into_response()
    }
}

/// Helper function to create successful API responses
pub fn api_success<T>(data: T) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: None,
    }
}

/// Helper function to create successful API responses with metadata
pub fn api_success_with_meta<T>(data: T, metadata: ResponseMetadata) -> ApiResponse<T> {
    ApiResponse {
        success: true,
        data,
        metadata: Some(metadata),
    }
}

/// Convert SQLx errors to API errors
impl From<sqlx::Error> for ApiError {
    fn from(sqlx_error: sqlx::Error) -> Self {
        ApiError::Database(database_layer::DatabaseError::SqlxError(sqlx_error))
    }
}

/// Convert anyhow errors to API errors
impl From<anyhow::Error> for ApiError {
    fn from(error: anyhow::Error) -> Self {
        ApiError::Internal {
            message: error.to_string(),
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_maps_to_400() {
        let err = ApiError::validation("patient_id is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_type(), "validation_error");
    }

    #[test]
    fn not_found_maps_to_404() {
        let err = ApiError::not_found("appointment");
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn storage_errors_map_to_500_with_generic_message() {
        let err = ApiError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.client_message(), "Server error");
        assert_eq!(err.code(), error_common::codes::database::QUERY_FAILED);
    }

    #[test]
    fn validation_message_reaches_the_client() {
        let err = ApiError::validation("scheduled_at must be a valid RFC 3339 datetime");
        assert!(err.client_message().contains("scheduled_at"));
    }

    #[test]
    fn success_envelope_shape() {
        let body = serde_json::to_value(api_success(vec![1, 2, 3])).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], serde_json::json!([1, 2, 3]));
        assert!(body.get("metadata").is_none());
    }
}

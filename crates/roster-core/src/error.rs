//! Unified error types for all layers of the application.

use crate::FieldErrors;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Unified error type for all layers of Roster.
#[derive(Error, Debug)]
pub enum RosterError {
    // ============ Domain Errors ============
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Field-addressable validation failure
    #[error("Validation error: {0}")]
    Validation(FieldErrors),

    /// Conflict error (e.g., duplicate entry)
    #[error("Conflict: {0}")]
    Conflict(String),

    // ============ Infrastructure Errors ============
    /// Database error
    #[error("Database error: {0}")]
    Database(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ============ Internal Errors ============
    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RosterError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) => 422,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error with a single field message.
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(FieldErrors::single(field, message))
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true when the error is caused by the caller rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}

impl From<FieldErrors> for RosterError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for RosterError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => {
                // PostgreSQL / MySQL unique violation
                if let Some(code) = db_err.code() {
                    if code == "23505" || code == "1062" {
                        return Self::Conflict(db_err.message().to_string());
                    }
                }
                Self::Database(err.to_string())
            }
            _ => Self::Database(err.to_string()),
        }
    }
}

/// Serializable error body returned by the HTTP layer.
///
/// Not-found and server errors carry only `message`; validation errors
/// also carry the per-field `errors` map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Human-readable error message
    pub message: String,
    /// Field-level validation messages
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorResponse {
    /// Message used for field validation failures.
    pub const VALIDATION_MESSAGE: &'static str = "Validation error";

    /// Message used for every 5xx response.
    pub const SERVER_ERROR_MESSAGE: &'static str = "Server Error";

    /// Creates a message-only response.
    #[must_use]
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    /// Creates a validation response with field errors.
    #[must_use]
    pub fn validation(errors: FieldErrors) -> Self {
        Self {
            message: Self::VALIDATION_MESSAGE.to_string(),
            errors: Some(errors),
        }
    }

    /// Builds the public response for an error. Server-side details never leak.
    #[must_use]
    pub fn from_error(error: &RosterError) -> Self {
        match error {
            RosterError::NotFound { resource_type, .. } => {
                Self::message(format!("{resource_type} not found"))
            }
            RosterError::Validation(errors) => Self::validation(errors.clone()),
            RosterError::Conflict(message) => Self::message(message.clone()),
            RosterError::Database(_)
            | RosterError::Configuration(_)
            | RosterError::Internal(_)
            | RosterError::Other(_) => Self::message(Self::SERVER_ERROR_MESSAGE),
        }
    }
}

impl From<&RosterError> for ErrorResponse {
    fn from(error: &RosterError) -> Self {
        Self::from_error(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(RosterError::not_found("User", 1).status_code(), 404);
        assert_eq!(RosterError::validation("email", "bad").status_code(), 422);
        assert_eq!(RosterError::conflict("duplicate").status_code(), 409);
        assert_eq!(RosterError::Database("db error".to_string()).status_code(), 500);
        assert_eq!(RosterError::internal("oops").status_code(), 500);
        assert_eq!(RosterError::Configuration("missing".to_string()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(RosterError::not_found("User", 1).error_code(), "NOT_FOUND");
        assert_eq!(RosterError::validation("name", "bad").error_code(), "VALIDATION_ERROR");
        assert_eq!(RosterError::conflict("duplicate").error_code(), "CONFLICT");
        assert_eq!(RosterError::Database("db".to_string()).error_code(), "DATABASE_ERROR");
        assert_eq!(RosterError::internal("err").error_code(), "INTERNAL_ERROR");
        assert_eq!(
            RosterError::Other(anyhow::anyhow!("boom")).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_client_errors() {
        assert!(RosterError::not_found("User", 1).is_client_error());
        assert!(RosterError::validation("email", "bad").is_client_error());
        assert!(!RosterError::Database("down".to_string()).is_client_error());
    }

    #[test]
    fn test_error_display() {
        let not_found = RosterError::not_found("User", "123");
        assert!(not_found.to_string().contains("User"));
        assert!(not_found.to_string().contains("123"));

        let validation = RosterError::validation("phone", "too short");
        assert_eq!(validation.to_string(), "Validation error: phone: too short");
    }

    #[test]
    fn test_not_found_response_body() {
        let response = ErrorResponse::from_error(&RosterError::not_found("User", 1));
        assert_eq!(response.message, "User not found");
        assert!(response.errors.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "User not found" }));
    }

    #[test]
    fn test_validation_response_body() {
        let err = RosterError::validation("email", "The email has already been taken.");
        let json = serde_json::to_value(ErrorResponse::from(&err)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "Validation error",
                "errors": { "email": ["The email has already been taken."] }
            })
        );
    }

    #[test]
    fn test_server_error_response_hides_details() {
        let err = RosterError::Database("password=secret host unreachable".to_string());
        let response = ErrorResponse::from_error(&err);
        assert_eq!(response.message, "Server Error");
        assert!(response.errors.is_none());
    }
}

// src/application/error_handling.rs
//
// Error Handling for Commands
//
// ARCHITECTURE:
// - Maps internal errors → consumer-facing responses
// - Provides a consistent error format
// - Never exposes internal implementation details
// - Logs errors for debugging

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Standard error response for consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_type: ErrorType,
    pub message: String,
    pub details: Option<String>,
}

/// Error categories for consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Row not found (404)
    NotFound,

    /// Several rows where one was expected (409)
    Conflict,

    /// Invalid input / query (400)
    Validation,

    /// Local database error (500)
    Database,

    /// Remote backend or transport error (502)
    Backend,

    /// Missing or invalid configuration
    Configuration,

    /// Other/unknown error (500)
    Internal,
}

impl ErrorResponse {
    fn new(error_type: ErrorType, message: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error_type,
            message: message.into(),
            details,
        }
    }

    /// Create error response from AppError
    pub fn from_app_error(error: &AppError) -> Self {
        match error {
            AppError::Shared(inner) => Self::from_app_error(inner),

            AppError::NotFound { table, .. } => {
                Self::new(ErrorType::NotFound, format!("No matching {} record", table), Some(error.to_string()))
            }

            AppError::Ambiguous { table, count, .. } => Self::new(
                ErrorType::Conflict,
                format!("{} {} records matched where one was expected", count, table),
                Some(error.to_string()),
            ),

            AppError::InvalidQuery(message) => Self::new(ErrorType::Validation, message.clone(), None),

            AppError::Database(_) | AppError::Pool(_) => {
                log::error!("Database error: {}", error);
                Self::new(
                    ErrorType::Database,
                    "Database operation failed",
                    Some("Check logs for details".to_string()),
                )
            }

            AppError::Http(_) | AppError::Backend { .. } => {
                log::error!("Backend error: {}", error);
                Self::new(ErrorType::Backend, "Catalog backend unavailable", Some(error.to_string()))
            }

            AppError::Serialization(_) => {
                log::error!("Serialization error: {}", error);
                Self::new(ErrorType::Internal, "Data serialization failed", None)
            }

            AppError::Io(io_error) => {
                log::error!("IO error: {}", io_error);
                Self::new(ErrorType::Internal, "File system operation failed", Some(io_error.to_string()))
            }

            AppError::Config(message) => Self::new(ErrorType::Configuration, message.clone(), None),

            AppError::Other(message) => {
                log::error!("Other error: {}", message);
                Self::new(ErrorType::Internal, message.clone(), None)
            }
        }
    }
}

/// Helper trait to convert Results to a serialized ErrorResponse
pub trait ToErrorResponse<T> {
    fn to_error_response(self) -> Result<T, String>;
}

impl<T> ToErrorResponse<T> for Result<T, AppError> {
    fn to_error_response(self) -> Result<T, String> {
        self.map_err(|e| {
            let error_response = ErrorResponse::from_app_error(&e);
            serde_json::to_string(&error_response)
                .unwrap_or_else(|_| "Internal error".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_not_found_error() {
        let error = ErrorResponse::from_app_error(&AppError::NotFound {
            table: "movie".to_string(),
            column: "content_id".to_string(),
            value: "abc".to_string(),
        });
        assert_eq!(error.error_type, ErrorType::NotFound);
        assert_eq!(error.message, "No matching movie record");
    }

    #[test]
    fn test_shared_error_maps_like_inner() {
        let inner = Arc::new(AppError::Backend { status: 503, message: "down".to_string() });
        let error = ErrorResponse::from_app_error(&AppError::Shared(inner));
        assert_eq!(error.error_type, ErrorType::Backend);
        assert!(!error.success);
    }

    #[test]
    fn test_invalid_query_is_validation_error() {
        let error = ErrorResponse::from_app_error(&AppError::InvalidQuery("Invalid column name 'x y'".to_string()));
        assert_eq!(error.error_type, ErrorType::Validation);
        assert_eq!(error.message, "Invalid column name 'x y'");
        assert_eq!(error.details, None);
    }

    #[test]
    fn test_serialization() {
        let result: Result<(), AppError> = Err(AppError::Ambiguous {
            table: "season".to_string(),
            column: "season_id".to_string(),
            value: "s1".to_string(),
            count: 2,
        });
        let json = result.to_error_response().unwrap_err();
        assert!(json.contains("\"conflict\""));
        assert!(json.contains("2 season records"));
    }
}

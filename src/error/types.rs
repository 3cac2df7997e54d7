// src/error/types.rs
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Pool error: {0}")]
    Pool(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend error ({status}): {message}")]
    Backend { status: u16, message: String },

    #[error("No row in {table} where {column} = {value}")]
    NotFound {
        table: String,
        column: String,
        value: String,
    },

    #[error("{count} rows in {table} where {column} = {value}, expected exactly one")]
    Ambiguous {
        table: String,
        column: String,
        value: String,
        count: usize,
    },

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Failure of a load that several cache callers were waiting on.
    #[error("{0}")]
    Shared(Arc<AppError>),

    #[error("Other error: {0}")]
    Other(String),
}

impl AppError {
    /// Transport or query failures that may succeed on a later attempt.
    ///
    /// Missing and ambiguous rows are answers, not faults, and are never
    /// worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            AppError::Database(err) => is_transient_sqlite(err),
            AppError::Pool(_) | AppError::Http(_) => true,
            AppError::Backend { status, .. } => *status == 0 || *status >= 500 || *status == 429,
            AppError::Shared(inner) => inner.is_transient(),
            _ => false,
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            AppError::NotFound { .. } => true,
            AppError::Shared(inner) => inner.is_not_found(),
            _ => false,
        }
    }

    pub fn is_ambiguous(&self) -> bool {
        match self {
            AppError::Ambiguous { .. } => true,
            AppError::Shared(inner) => inner.is_ambiguous(),
            _ => false,
        }
    }
}

/// Contention and I/O faults; schema, constraint and conversion errors
/// fail the same way on every attempt.
fn is_transient_sqlite(err: &rusqlite::Error) -> bool {
    use rusqlite::ErrorCode;

    match err {
        rusqlite::Error::SqliteFailure(failure, _) => matches!(
            failure.code,
            ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked | ErrorCode::SystemIoFailure
        ),
        _ => false,
    }
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<r2d2::Error> for AppError {
    fn from(err: r2d2::Error) -> Self {
        AppError::Pool(err.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

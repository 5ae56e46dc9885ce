//! Unified error handling
//!
//! Every multi-step operation runs inside one transaction; on any variant
//! below the transaction rolls back in full. Callers always receive a
//! distinguishable kind plus a human-readable detail message.

use crate::db::repository::RepoError;

/// Application error taxonomy.
///
/// | Variant | Meaning |
/// |---|---|
/// | `Forbidden` | Caller lacks the required permission |
/// | `Validation` | Malformed or out-of-range input, caught before any write |
/// | `NotFound` | Referenced member/period/branch/seat/shift/locker absent |
/// | `Conflict` | Resource already held, or overpayment beyond tolerance |
/// | `Database` | Storage failure surfaced by sqlx |
/// | `Internal` | Unexpected state; always after rollback |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Permission denied: {0}")]
    Forbidden(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => AppError::NotFound(msg),
            RepoError::Conflict(msg) => AppError::Conflict(msg),
            RepoError::Database(msg) => AppError::Database(msg),
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::from(RepoError::from(err))
    }
}

/// Result alias used across the service layer.
pub type AppResult<T> = Result<T, AppError>;

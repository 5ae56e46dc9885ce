//! Repository Module
//!
//! Row-level operations on the ledger tables. Every write-path function
//! takes a `&mut SqliteConnection` so it composes into the caller's
//! transaction; read-only query helpers take the pool directly.

pub mod assignment;
pub mod locker;
pub mod member;
pub mod period;
pub mod reference;

use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for RepoError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            // Unique-index violations are resource contention, not failures:
            // the constraint is the arbiter of seat/locker exclusivity.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Conflict(db.message().to_string())
            }
            // A writer that lost to a concurrent one (SQLITE_BUSY /
            // SQLITE_LOCKED, incl. the extended snapshot variants) is
            // contention too, and retryable.
            sqlx::Error::Database(db) if is_write_contention(db.code().as_deref()) => {
                RepoError::Conflict(db.message().to_string())
            }
            _ => RepoError::Database(err.to_string()),
        }
    }
}

// The low byte of an extended SQLite result code is the primary code;
// 5 = BUSY, 6 = LOCKED.
fn is_write_contention(code: Option<&str>) -> bool {
    matches!(
        code.and_then(|c| c.parse::<i64>().ok()).map(|c| c & 0xFF),
        Some(5) | Some(6)
    )
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

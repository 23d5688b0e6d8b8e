//! Error handling utilities for repositories

use queue_core::error::DomainError;
use sqlx::Error as SqlxError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create a "suggestion not found" error
pub fn suggestion_not_found(idx: i64) -> DomainError {
    DomainError::SuggestionNotFound(idx)
}

//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::SuggestionState;
use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Usage Errors (caller mistakes, reported back and never treated as faults)
    // =========================================================================
    #[error("Suggestion #{idx} is {state} and can no longer be moved")]
    InvalidTransition { idx: i64, state: SuggestionState },

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Suggestion #{0} is not in the public queue")]
    NotPublic(i64),

    #[error("Suggestion #{0} was not submitted by you")]
    NotSuggestionOwner(i64),

    #[error("Invalid comparison: {0}")]
    InvalidComparison(String),

    #[error("A comparison is already in progress")]
    ComparisonInProgress,

    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Suggestion not found: #{0}")]
    SuggestionNotFound(i64),

    #[error("Message not found: {0}")]
    MessageNotFound(Snowflake),

    #[error("User not found: {0}")]
    UserNotFound(Snowflake),

    // =========================================================================
    // Data Integrity Faults
    // =========================================================================
    #[error("Uploaded emoji {emoji_id} for suggestion #{idx} was not found")]
    ResourceMissing { idx: i64, emoji_id: Snowflake },

    #[error("Corrupt suggestion record #{idx}: {reason}")]
    CorruptRecord { idx: i64, reason: String },

    // =========================================================================
    // Resource Exhaustion
    // =========================================================================
    #[error("No free emoji or container slots: {0}")]
    ResourceExhausted(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Transport error: {0}")]
    TransportError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Usage
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::InvalidReference(_) => "INVALID_REFERENCE",
            Self::NotPublic(_) => "NOT_PUBLIC",
            Self::NotSuggestionOwner(_) => "NOT_SUGGESTION_OWNER",
            Self::InvalidComparison(_) => "INVALID_COMPARISON",
            Self::ComparisonInProgress => "COMPARISON_IN_PROGRESS",

            // Not Found
            Self::SuggestionNotFound(_) => "UNKNOWN_SUGGESTION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::UserNotFound(_) => "UNKNOWN_USER",

            // Integrity
            Self::ResourceMissing { .. } => "RESOURCE_MISSING",
            Self::CorruptRecord { .. } => "CORRUPT_RECORD",

            Self::ResourceExhausted(_) => "RESOURCE_EXHAUSTED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::TransportError(_) => "TRANSPORT_ERROR",
        }
    }

    /// Check if this is a usage error (bad command, wrong state)
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            Self::InvalidTransition { .. }
                | Self::InvalidReference(_)
                | Self::NotPublic(_)
                | Self::NotSuggestionOwner(_)
                | Self::InvalidComparison(_)
                | Self::ComparisonInProgress
        )
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SuggestionNotFound(_) | Self::MessageNotFound(_) | Self::UserNotFound(_)
        )
    }

    /// Check if this error indicates stored data no longer matches the platform
    pub fn is_integrity_fault(&self) -> bool {
        matches!(self, Self::ResourceMissing { .. } | Self::CorruptRecord { .. })
    }

    /// Check if an external collaborator failed
    pub fn is_external(&self) -> bool {
        matches!(self, Self::DatabaseError(_) | Self::TransportError(_))
    }
}

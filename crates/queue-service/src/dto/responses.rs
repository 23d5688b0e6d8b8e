//! Response DTOs for API endpoints
//!
//! Snowflake IDs are serialized as strings for JavaScript compatibility.

use chrono::{DateTime, Utc};
use queue_core::{Snowflake, Suggestion, SuggestionState};
use serde::Serialize;

/// Plain text reply
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A suggestion with its rendered status
#[derive(Debug, Clone, Serialize)]
pub struct SuggestionResponse {
    pub idx: i64,
    pub user_id: Snowflake,
    pub emoji_id: Snowflake,
    pub emoji_name: String,
    pub emoji_animated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub state: SuggestionState,
    pub upvotes: i32,
    pub downvotes: i32,
    pub submission_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_by: Option<Snowflake>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_reason: Option<String>,
    pub revoked: bool,
    pub status: String,
}

impl From<&Suggestion> for SuggestionResponse {
    fn from(s: &Suggestion) -> Self {
        Self {
            idx: s.idx,
            user_id: s.user_id,
            emoji_id: s.emoji_id,
            emoji_name: s.emoji_name.clone(),
            emoji_animated: s.emoji_animated,
            note: s.note.clone(),
            state: s.state(),
            upvotes: s.upvotes,
            downvotes: s.downvotes,
            submission_time: s.submission_time,
            validation_time: s.validation_time,
            forced_by: s.forced_by,
            forced_reason: s.forced_reason.clone(),
            revoked: s.revoked,
            status: s.status_text(),
        }
    }
}

// ============================================================================
// Health Responses
// ============================================================================

/// Basic health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
        }
    }
}

/// Readiness check response
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub checks: HealthChecks,
}

/// Health of each backing service
#[derive(Debug, Clone, Serialize)]
pub struct HealthChecks {
    /// `healthy`, `unhealthy`, or `in_memory` when no database is configured
    pub database: String,
}

impl ReadinessResponse {
    /// `database_healthy` is `None` when running on the in-memory store
    pub fn ready(database_healthy: Option<bool>) -> Self {
        let (ready, database) = match database_healthy {
            None => (true, "in_memory"),
            Some(true) => (true, "healthy"),
            Some(false) => (false, "unhealthy"),
        };
        Self {
            status: if ready { "ready" } else { "not_ready" }.to_string(),
            timestamp: Utc::now(),
            checks: HealthChecks {
                database: database.to_string(),
            },
        }
    }
}

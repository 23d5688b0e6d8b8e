//! Request DTOs for API endpoints
//!
//! All request DTOs implement `Deserialize`; those with constraints also
//! implement `Validate`.

use queue_core::Snowflake;
use serde::Deserialize;
use validator::Validate;

use crate::services::ComparisonRef;

/// Manual promote or deny
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TransitionRequest {
    pub actor_id: Snowflake,

    #[validate(length(min = 1, max = 512, message = "Reason must be 1-512 characters"))]
    pub reason: Option<String>,
}

/// Self-revocation by a submitter
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RevokeRequest {
    pub caller_id: Snowflake,

    /// Defaults to the caller's latest suggestion
    #[validate(range(min = 1, message = "Suggestion index must be positive"))]
    pub idx: Option<i64>,
}

/// Start a comparison.
///
/// The option count is checked by the comparison workflow itself.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ComparisonRequest {
    pub actor_id: Snowflake,
    /// Where the confirmation prompt goes
    pub channel_id: Snowflake,
    pub options: Vec<ComparisonRef>,
}

/// Query parameters for listing recent suggestions
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ListSuggestionsQuery {
    #[validate(range(min = 1, max = 200, message = "Limit must be 1-200"))]
    pub limit: Option<i64>,
}

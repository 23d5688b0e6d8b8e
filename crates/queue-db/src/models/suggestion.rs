//! Suggestion database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Column list selected whenever a full row is read back
pub const SUGGESTION_COLUMNS: &str = "idx, user_id, emoji_id, emoji_name, emoji_animated, note, \
    submission_time, council_message_id, public_message_id, suggestions_message_id, upvotes, \
    downvotes, council_approved, forced_by, forced_reason, validation_time, revoked";

/// Database model for suggestions table
#[derive(Debug, Clone, FromRow)]
pub struct SuggestionModel {
    pub idx: i64,
    pub user_id: i64,
    pub emoji_id: i64,
    pub emoji_name: String,
    pub emoji_animated: bool,
    pub note: Option<String>,
    pub submission_time: DateTime<Utc>,
    pub council_message_id: Option<i64>,
    pub public_message_id: Option<i64>,
    pub suggestions_message_id: Option<i64>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub council_approved: Option<bool>,
    pub forced_by: Option<i64>,
    pub forced_reason: Option<String>,
    pub validation_time: Option<DateTime<Utc>>,
    pub revoked: bool,
}

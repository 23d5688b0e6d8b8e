//! Council vote database model

use sqlx::FromRow;

/// Database model for council_votes table
#[derive(Debug, Clone, FromRow)]
pub struct CouncilVoteModel {
    pub suggestion_idx: i64,
    pub user_id: i64,
    pub has_approved: bool,
    pub has_denied: bool,
}

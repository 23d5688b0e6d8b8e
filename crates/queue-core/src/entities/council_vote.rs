//! Council vote entity - the last stance one reviewer took on a suggestion

use serde::Serialize;

use crate::value_objects::{Snowflake, VoteMarker};

/// Council vote entity (one row per suggestion and reviewer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CouncilVote {
    pub suggestion_idx: i64,
    pub user_id: Snowflake,
    pub has_approved: bool,
    pub has_denied: bool,
}

impl CouncilVote {
    pub fn new(suggestion_idx: i64, user_id: Snowflake) -> Self {
        Self {
            suggestion_idx,
            user_id,
            has_approved: false,
            has_denied: false,
        }
    }

    /// Overwrite the stance for one marker, leaving the other untouched
    pub fn set_stance(&mut self, marker: VoteMarker, value: bool) {
        match marker {
            VoteMarker::Approve => self.has_approved = value,
            VoteMarker::Deny => self.has_denied = value,
        }
    }
}

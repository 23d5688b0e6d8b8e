//! Council vote entity <-> model mapper

use queue_core::entities::CouncilVote;
use queue_core::value_objects::Snowflake;

use crate::models::CouncilVoteModel;

impl From<CouncilVoteModel> for CouncilVote {
    fn from(model: CouncilVoteModel) -> Self {
        CouncilVote {
            suggestion_idx: model.suggestion_idx,
            user_id: Snowflake::new(model.user_id),
            has_approved: model.has_approved,
            has_denied: model.has_denied,
        }
    }
}

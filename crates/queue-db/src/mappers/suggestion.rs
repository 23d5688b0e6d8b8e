//! Suggestion entity <-> model mapper

use queue_core::entities::Suggestion;
use queue_core::error::DomainError;
use queue_core::value_objects::Snowflake;

use crate::models::SuggestionModel;

/// Convert a row into a validated Suggestion entity
impl TryFrom<SuggestionModel> for Suggestion {
    type Error = DomainError;

    fn try_from(model: SuggestionModel) -> Result<Self, Self::Error> {
        Suggestion {
            idx: model.idx,
            user_id: Snowflake::new(model.user_id),
            emoji_id: Snowflake::new(model.emoji_id),
            emoji_name: model.emoji_name,
            emoji_animated: model.emoji_animated,
            note: model.note,
            submission_time: model.submission_time,
            council_message_id: model.council_message_id.map(Snowflake::new),
            public_message_id: model.public_message_id.map(Snowflake::new),
            suggestions_message_id: model.suggestions_message_id.map(Snowflake::new),
            upvotes: model.upvotes,
            downvotes: model.downvotes,
            council_approved: model.council_approved,
            forced_by: model.forced_by.map(Snowflake::new),
            forced_reason: model.forced_reason,
            validation_time: model.validation_time,
            revoked: model.revoked,
        }
        .validate()
    }
}

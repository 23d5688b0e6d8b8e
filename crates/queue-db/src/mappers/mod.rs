//! Model to entity mappers
//!
//! - `TryFrom<SuggestionModel> for Suggestion`: rows are validated on the way in
//! - `From<CouncilVoteModel> for CouncilVote`

mod council_vote;
mod suggestion;

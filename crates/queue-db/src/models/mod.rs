//! Database models - SQLx-compatible structs for PostgreSQL tables

mod council_vote;
mod suggestion;

pub use council_vote::CouncilVoteModel;
pub use suggestion::{SuggestionModel, SUGGESTION_COLUMNS};

//! Ports the service layer is written against

mod repositories;
mod transport;

pub use repositories::{CouncilVoteRepository, RepoResult, SuggestionRepository};
pub use transport::MessagingTransport;

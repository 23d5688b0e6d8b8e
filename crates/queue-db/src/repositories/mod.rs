//! Repository implementations
//!
//! PostgreSQL implementations of the store ports defined in queue-core, plus
//! an in-memory store with the same semantics.

mod council_vote;
mod error;
mod memory;
mod suggestion;

pub use council_vote::PgCouncilVoteRepository;
pub use memory::InMemoryStore;
pub use suggestion::PgSuggestionRepository;

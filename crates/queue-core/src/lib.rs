//! # queue-core
//!
//! Domain layer for the emoji suggestion queue: the suggestion entity and its
//! lifecycle, vote value objects, inbound events, and the ports (store and
//! messaging transport) the service layer is written against.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Attachment, BufferContainer, CouncilVote, FileUpload, ImageSource, NewSuggestion, OutgoingMessage,
    ResourceHandle, Suggestion, SuggestionState, TransitionUpdate, UserHandle,
    CONTAINER_SLOT_LIMIT, MAX_OWNED_CONTAINERS,
};
pub use error::DomainError;
pub use events::{MarkerEvent, MarkerKind, SubmissionPosted};
pub use traits::{CouncilVoteRepository, MessagingTransport, RepoResult, SuggestionRepository};
pub use value_objects::{
    Marker, Snowflake, SnowflakeParseError, Verdict, VoteDelta, VoteMarker, VoteThresholds,
};

//! Domain entities - core business objects

mod council_vote;
mod platform;
mod suggestion;

pub use council_vote::CouncilVote;
pub use platform::{
    Attachment, BufferContainer, FileUpload, ImageSource, OutgoingMessage, ResourceHandle,
    UserHandle, CONTAINER_SLOT_LIMIT, MAX_OWNED_CONTAINERS,
};
pub use suggestion::{NewSuggestion, Suggestion, SuggestionState, TransitionUpdate};

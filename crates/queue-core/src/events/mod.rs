//! Inbound events pushed by the messaging gateway

mod queue_event;

pub use queue_event::{MarkerEvent, MarkerKind, SubmissionPosted};

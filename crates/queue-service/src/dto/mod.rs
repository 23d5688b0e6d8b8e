//! Data transfer objects for API requests and responses

pub mod requests;
pub mod responses;

pub use requests::{ComparisonRequest, ListSuggestionsQuery, RevokeRequest, TransitionRequest};
pub use responses::{
    HealthChecks, HealthResponse, MessageResponse, ReadinessResponse, SuggestionResponse,
};

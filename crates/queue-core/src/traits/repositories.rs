//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation (PostgreSQL or in-memory).

use async_trait::async_trait;

use crate::entities::{CouncilVote, NewSuggestion, Suggestion, TransitionUpdate};
use crate::error::DomainError;
use crate::value_objects::{Snowflake, VoteMarker};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Suggestion Repository
// ============================================================================

#[async_trait]
pub trait SuggestionRepository: Send + Sync {
    /// Find suggestion by idx
    async fn find_by_idx(&self, idx: i64) -> RepoResult<Option<Suggestion>>;

    /// Find the suggestion owning a council queue or approval queue message
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Option<Suggestion>>;

    /// Most recent suggestions, newest first
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Suggestion>>;

    /// Most recent suggestion submitted by a user
    async fn find_latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<Suggestion>>;

    /// Insert a pending suggestion, returning its idx
    async fn create(&self, suggestion: &NewSuggestion) -> RepoResult<i64>;

    /// Add `delta` to one vote counter and return the fresh row
    async fn apply_vote_delta(
        &self,
        idx: i64,
        marker: VoteMarker,
        delta: i32,
    ) -> RepoResult<Suggestion>;

    /// Zero both vote counters
    async fn reset_votes(&self, idx: i64) -> RepoResult<Suggestion>;

    /// Apply a terminal transition in one transaction.
    ///
    /// The row is re-checked under lock: a suggestion that is no longer
    /// pending fails with `InvalidTransition` and nothing is written.
    async fn record_transition(
        &self,
        idx: i64,
        update: &TransitionUpdate,
    ) -> RepoResult<Suggestion>;
}

// ============================================================================
// Council Vote Repository
// ============================================================================

#[async_trait]
pub trait CouncilVoteRepository: Send + Sync {
    /// Upsert one reviewer's stance for one marker (last value wins)
    async fn upsert_stance(
        &self,
        suggestion_idx: i64,
        user_id: Snowflake,
        marker: VoteMarker,
        value: bool,
    ) -> RepoResult<()>;

    /// Find one reviewer's stance
    async fn find(&self, suggestion_idx: i64, user_id: Snowflake)
        -> RepoResult<Option<CouncilVote>>;

    /// All stances recorded for a suggestion
    async fn find_by_suggestion(&self, suggestion_idx: i64) -> RepoResult<Vec<CouncilVote>>;
}

//! In-memory implementation of the suggestion store ports.
//!
//! All records live in one map behind a `RwLock` and are lost on restart.
//! Every method takes the lock once, so each call is atomic just like the
//! PostgreSQL transaction it stands in for.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use queue_core::entities::{CouncilVote, NewSuggestion, Suggestion, TransitionUpdate};
use queue_core::error::DomainError;
use queue_core::traits::{CouncilVoteRepository, RepoResult, SuggestionRepository};
use queue_core::value_objects::{Snowflake, VoteMarker};

use super::error::suggestion_not_found;

#[derive(Default)]
struct StoreState {
    suggestions: BTreeMap<i64, Suggestion>,
    votes: HashMap<(i64, Snowflake), CouncilVote>,
    last_idx: i64,
}

/// In-memory suggestion and council vote store
#[derive(Default)]
pub struct InMemoryStore {
    state: RwLock<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a record as-is, e.g. when seeding from an export.
    ///
    /// The record is validated first and later inserts continue after the
    /// highest idx seen.
    pub async fn insert(&self, suggestion: Suggestion) -> RepoResult<()> {
        let suggestion = suggestion.validate()?;
        let mut state = self.state.write().await;
        state.last_idx = state.last_idx.max(suggestion.idx);
        state.suggestions.insert(suggestion.idx, suggestion);
        Ok(())
    }
}

#[async_trait]
impl SuggestionRepository for InMemoryStore {
    async fn find_by_idx(&self, idx: i64) -> RepoResult<Option<Suggestion>> {
        let state = self.state.read().await;
        Ok(state.suggestions.get(&idx).cloned())
    }

    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Option<Suggestion>> {
        let state = self.state.read().await;
        Ok(state
            .suggestions
            .values()
            .find(|s| s.owns_message(message_id))
            .cloned())
    }

    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Suggestion>> {
        let state = self.state.read().await;
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(state
            .suggestions
            .values()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<Suggestion>> {
        let state = self.state.read().await;
        Ok(state
            .suggestions
            .values()
            .rev()
            .find(|s| s.user_id == user_id)
            .cloned())
    }

    async fn create(&self, suggestion: &NewSuggestion) -> RepoResult<i64> {
        let mut state = self.state.write().await;
        state.last_idx += 1;
        let idx = state.last_idx;
        state
            .suggestions
            .insert(idx, Suggestion::from_new(idx, suggestion, Utc::now()));
        Ok(idx)
    }

    async fn apply_vote_delta(
        &self,
        idx: i64,
        marker: VoteMarker,
        delta: i32,
    ) -> RepoResult<Suggestion> {
        let mut state = self.state.write().await;
        let suggestion = state
            .suggestions
            .get_mut(&idx)
            .ok_or_else(|| suggestion_not_found(idx))?;

        let counter = match marker {
            VoteMarker::Approve => &mut suggestion.upvotes,
            VoteMarker::Deny => &mut suggestion.downvotes,
        };
        *counter += delta;

        Ok(suggestion.clone())
    }

    async fn reset_votes(&self, idx: i64) -> RepoResult<Suggestion> {
        let mut state = self.state.write().await;
        let suggestion = state
            .suggestions
            .get_mut(&idx)
            .ok_or_else(|| suggestion_not_found(idx))?;

        suggestion.upvotes = 0;
        suggestion.downvotes = 0;
        Ok(suggestion.clone())
    }

    async fn record_transition(
        &self,
        idx: i64,
        update: &TransitionUpdate,
    ) -> RepoResult<Suggestion> {
        let mut state = self.state.write().await;
        let suggestion = state
            .suggestions
            .get_mut(&idx)
            .ok_or_else(|| suggestion_not_found(idx))?;

        suggestion.ensure_pending()?;

        let mut updated = suggestion.clone();
        update.apply_to(&mut updated);
        let updated = updated.validate()?;
        *suggestion = updated.clone();

        Ok(updated)
    }
}

#[async_trait]
impl CouncilVoteRepository for InMemoryStore {
    async fn upsert_stance(
        &self,
        suggestion_idx: i64,
        user_id: Snowflake,
        marker: VoteMarker,
        value: bool,
    ) -> RepoResult<()> {
        let mut state = self.state.write().await;
        if !state.suggestions.contains_key(&suggestion_idx) {
            return Err(DomainError::DatabaseError(format!(
                "council vote references unknown suggestion #{suggestion_idx}"
            )));
        }

        state
            .votes
            .entry((suggestion_idx, user_id))
            .or_insert_with(|| CouncilVote::new(suggestion_idx, user_id))
            .set_stance(marker, value);
        Ok(())
    }

    async fn find(
        &self,
        suggestion_idx: i64,
        user_id: Snowflake,
    ) -> RepoResult<Option<CouncilVote>> {
        let state = self.state.read().await;
        Ok(state.votes.get(&(suggestion_idx, user_id)).copied())
    }

    async fn find_by_suggestion(&self, suggestion_idx: i64) -> RepoResult<Vec<CouncilVote>> {
        let state = self.state.read().await;
        let mut votes: Vec<CouncilVote> = state
            .votes
            .values()
            .filter(|vote| vote.suggestion_idx == suggestion_idx)
            .copied()
            .collect();
        votes.sort_by_key(|vote| vote.user_id);
        Ok(votes)
    }
}

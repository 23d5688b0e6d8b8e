//! PostgreSQL implementation of SuggestionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use queue_core::entities::{NewSuggestion, Suggestion, TransitionUpdate};
use queue_core::traits::{RepoResult, SuggestionRepository};
use queue_core::value_objects::{Snowflake, VoteMarker};

use crate::models::{SuggestionModel, SUGGESTION_COLUMNS};

use super::error::{map_db_error, suggestion_not_found};

/// PostgreSQL implementation of SuggestionRepository
#[derive(Clone)]
pub struct PgSuggestionRepository {
    pool: PgPool,
}

impl PgSuggestionRepository {
    /// Create a new PgSuggestionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn into_entities(models: Vec<SuggestionModel>) -> RepoResult<Vec<Suggestion>> {
    models.into_iter().map(Suggestion::try_from).collect()
}

#[async_trait]
impl SuggestionRepository for PgSuggestionRepository {
    #[instrument(skip(self))]
    async fn find_by_idx(&self, idx: i64) -> RepoResult<Option<Suggestion>> {
        let sql = format!("SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE idx = $1");
        let result = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(idx)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Suggestion::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_by_message(&self, message_id: Snowflake) -> RepoResult<Option<Suggestion>> {
        let sql = format!(
            "SELECT {SUGGESTION_COLUMNS} FROM suggestions \
             WHERE council_message_id = $1 OR public_message_id = $1"
        );
        let result = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(message_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Suggestion::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn find_recent(&self, limit: i64) -> RepoResult<Vec<Suggestion>> {
        let sql = format!("SELECT {SUGGESTION_COLUMNS} FROM suggestions ORDER BY idx DESC LIMIT $1");
        let results = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(limit.max(0))
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        into_entities(results)
    }

    #[instrument(skip(self))]
    async fn find_latest_by_user(&self, user_id: Snowflake) -> RepoResult<Option<Suggestion>> {
        let sql = format!(
            "SELECT {SUGGESTION_COLUMNS} FROM suggestions \
             WHERE user_id = $1 ORDER BY idx DESC LIMIT 1"
        );
        let result = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(user_id.into_inner())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        result.map(Suggestion::try_from).transpose()
    }

    #[instrument(skip(self, suggestion), fields(user_id = %suggestion.user_id))]
    async fn create(&self, suggestion: &NewSuggestion) -> RepoResult<i64> {
        let idx = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO suggestions (
                user_id, council_message_id, emoji_id, emoji_name, emoji_animated,
                note, suggestions_message_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING idx
            "#,
        )
        .bind(suggestion.user_id.into_inner())
        .bind(suggestion.council_message_id.into_inner())
        .bind(suggestion.emoji_id.into_inner())
        .bind(&suggestion.emoji_name)
        .bind(suggestion.emoji_animated)
        .bind(&suggestion.note)
        .bind(suggestion.suggestions_message_id.map(Snowflake::into_inner))
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(idx)
    }

    #[instrument(skip(self))]
    async fn apply_vote_delta(
        &self,
        idx: i64,
        marker: VoteMarker,
        delta: i32,
    ) -> RepoResult<Suggestion> {
        // Column names come from a closed set of static strings.
        let column = marker.counter_column();
        let sql = format!(
            "UPDATE suggestions SET {column} = {column} + $2 \
             WHERE idx = $1 RETURNING {SUGGESTION_COLUMNS}"
        );
        let result = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(idx)
            .bind(delta)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| suggestion_not_found(idx))?;

        Suggestion::try_from(result)
    }

    #[instrument(skip(self))]
    async fn reset_votes(&self, idx: i64) -> RepoResult<Suggestion> {
        let sql = format!(
            "UPDATE suggestions SET upvotes = 0, downvotes = 0 \
             WHERE idx = $1 RETURNING {SUGGESTION_COLUMNS}"
        );
        let result = sqlx::query_as::<_, SuggestionModel>(&sql)
            .bind(idx)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| suggestion_not_found(idx))?;

        Suggestion::try_from(result)
    }

    #[instrument(skip(self, update), fields(approved = update.approved))]
    async fn record_transition(
        &self,
        idx: i64,
        update: &TransitionUpdate,
    ) -> RepoResult<Suggestion> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // Lock the row and re-check it is still pending
        let lock_sql = format!("SELECT {SUGGESTION_COLUMNS} FROM suggestions WHERE idx = $1 FOR UPDATE");
        let current = sqlx::query_as::<_, SuggestionModel>(&lock_sql)
            .bind(idx)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| suggestion_not_found(idx))?;

        // Dropping `tx` on any early return rolls back
        Suggestion::try_from(current)?.ensure_pending()?;

        let update_sql = format!(
            "UPDATE suggestions SET \
                council_approved = $2, \
                public_message_id = $3, \
                council_message_id = NULL, \
                forced_by = $4, \
                forced_reason = $5, \
                validation_time = $6, \
                revoked = $7, \
                upvotes = CASE WHEN $2 THEN 0 ELSE upvotes END, \
                downvotes = CASE WHEN $2 THEN 0 ELSE downvotes END \
             WHERE idx = $1 RETURNING {SUGGESTION_COLUMNS}"
        );
        let updated = sqlx::query_as::<_, SuggestionModel>(&update_sql)
            .bind(idx)
            .bind(update.approved)
            .bind(update.public_message_id.map(Snowflake::into_inner))
            .bind(update.forced_by.map(Snowflake::into_inner))
            .bind(&update.forced_reason)
            .bind(update.validation_time)
            .bind(update.revoked)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let updated = Suggestion::try_from(updated)?;
        tx.commit().await.map_err(map_db_error)?;

        debug!(idx, state = %updated.state(), "Transition committed");
        Ok(updated)
    }
}

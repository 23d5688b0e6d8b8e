//! PostgreSQL implementation of CouncilVoteRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use queue_core::entities::CouncilVote;
use queue_core::traits::{CouncilVoteRepository, RepoResult};
use queue_core::value_objects::{Snowflake, VoteMarker};

use crate::models::CouncilVoteModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CouncilVoteRepository
#[derive(Clone)]
pub struct PgCouncilVoteRepository {
    pool: PgPool,
}

impl PgCouncilVoteRepository {
    /// Create a new PgCouncilVoteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CouncilVoteRepository for PgCouncilVoteRepository {
    #[instrument(skip(self))]
    async fn upsert_stance(
        &self,
        suggestion_idx: i64,
        user_id: Snowflake,
        marker: VoteMarker,
        value: bool,
    ) -> RepoResult<()> {
        let column = marker.stance_column();
        let sql = format!(
            "INSERT INTO council_votes (suggestion_idx, user_id, {column}) VALUES ($1, $2, $3) \
             ON CONFLICT (suggestion_idx, user_id) DO UPDATE SET {column} = EXCLUDED.{column}"
        );

        sqlx::query(&sql)
            .bind(suggestion_idx)
            .bind(user_id.into_inner())
            .bind(value)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        suggestion_idx: i64,
        user_id: Snowflake,
    ) -> RepoResult<Option<CouncilVote>> {
        let result = sqlx::query_as::<_, CouncilVoteModel>(
            r#"
            SELECT suggestion_idx, user_id, has_approved, has_denied
            FROM council_votes
            WHERE suggestion_idx = $1 AND user_id = $2
            "#,
        )
        .bind(suggestion_idx)
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CouncilVote::from))
    }

    #[instrument(skip(self))]
    async fn find_by_suggestion(&self, suggestion_idx: i64) -> RepoResult<Vec<CouncilVote>> {
        let results = sqlx::query_as::<_, CouncilVoteModel>(
            r#"
            SELECT suggestion_idx, user_id, has_approved, has_denied
            FROM council_votes
            WHERE suggestion_idx = $1
            ORDER BY user_id
            "#,
        )
        .bind(suggestion_idx)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(CouncilVote::from).collect())
    }
}

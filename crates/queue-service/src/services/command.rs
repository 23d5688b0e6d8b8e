//! Operator commands
//!
//! Every command answers with the text to show the operator.

use queue_core::{DomainError, Snowflake, Suggestion, CONTAINER_SLOT_LIMIT};
use tracing::{info, instrument, warn};

use crate::text::Table;

use super::buffer::BufferService;
use super::comparison::{ComparisonOutcome, ComparisonRef, ComparisonService};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::transition::{PromoteOutcome, TransitionService};

pub const DEFAULT_LIST_LIMIT: i64 = 10;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Longest reply the platform accepts
pub const MAX_REPLY_CHARS: usize = 2000;

/// Command service
pub struct CommandService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CommandService<'a> {
    /// Create a new CommandService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Force a pending suggestion into the approval queue
    #[instrument(skip(self, reason))]
    pub async fn promote(
        &self,
        actor: Snowflake,
        idx: i64,
        reason: Option<String>,
    ) -> ServiceResult<String> {
        let _lock = self.ctx.guard().lock_votes().await;
        let suggestion = self.find(idx).await?;

        info!(actor = %actor, "Manual promotion requested");
        match TransitionService::new(self.ctx)
            .promote(&suggestion, Some(actor), reason)
            .await?
        {
            PromoteOutcome::Promoted(_) => Ok(format!("Successfully moved #{idx}.")),
            PromoteOutcome::ResourceMissing => Err(DomainError::ResourceMissing {
                idx,
                emoji_id: suggestion.emoji_id,
            }
            .into()),
        }
    }

    /// Force-deny a pending suggestion
    #[instrument(skip(self, reason))]
    pub async fn deny(
        &self,
        actor: Snowflake,
        idx: i64,
        reason: Option<String>,
    ) -> ServiceResult<String> {
        let _lock = self.ctx.guard().lock_votes().await;
        let suggestion = self.find(idx).await?;

        info!(actor = %actor, "Manual denial requested");
        TransitionService::new(self.ctx)
            .deny(&suggestion, Some(actor), reason, false)
            .await?;
        Ok(format!("Successfully denied #{idx}."))
    }

    #[instrument(skip(self))]
    pub async fn status(&self, idx: i64) -> ServiceResult<String> {
        Ok(self.find(idx).await?.status_text())
    }

    /// Table of the most recent suggestions, newest first
    #[instrument(skip(self))]
    pub async fn list_recent(&self, limit: Option<i64>) -> ServiceResult<String> {
        let limit = limit.unwrap_or(DEFAULT_LIST_LIMIT);
        if !(1..=MAX_LIST_LIMIT).contains(&limit) {
            return Err(ServiceError::validation(format!(
                "limit must be between 1 and {MAX_LIST_LIMIT}"
            )));
        }

        let suggestions = self.ctx.suggestion_repo().find_recent(limit).await?;

        let mut table = Table::new(&["#", "Name", "Submitted By", "Points", "Status"]);
        for suggestion in &suggestions {
            let submitted_by = self.submitter_label(suggestion).await;
            table.add_row(vec![
                suggestion.idx.to_string(),
                format!(":{}:", suggestion.emoji_name),
                submitted_by,
                format!(
                    "\u{25B2} {} / \u{25BC} {}",
                    suggestion.upvotes, suggestion.downvotes
                ),
                suggestion.state().queue_label().to_string(),
            ]);
        }

        let text = format!("```\n{}\n```", table.render());
        if text.chars().count() > MAX_REPLY_CHARS {
            return Err(ServiceError::validation(
                "Result table was too big. Try lowering the limit.",
            ));
        }
        Ok(text)
    }

    /// Merge public suggestions into a head-to-head vote
    #[instrument(skip(self, refs))]
    pub async fn vs(
        &self,
        actor: Snowflake,
        channel_id: Snowflake,
        refs: &[ComparisonRef],
    ) -> ServiceResult<String> {
        match ComparisonService::new(self.ctx)
            .run(actor, channel_id, refs)
            .await?
        {
            ComparisonOutcome::Posted { labels, .. } => {
                Ok(format!("Posted comparison of {}.", labels.join(", ")))
            }
            ComparisonOutcome::Cancelled => Ok("Comparison cancelled.".to_string()),
        }
    }

    /// Withdraw the caller's own pending suggestion
    #[instrument(skip(self))]
    pub async fn revoke(&self, caller: Snowflake, idx: Option<i64>) -> ServiceResult<String> {
        let _lock = self.ctx.guard().lock_votes().await;
        let revoked = TransitionService::new(self.ctx).revoke(caller, idx).await?;
        Ok(format!("Revoked #{}.", revoked.idx))
    }

    /// The buffer container the next upload would go to
    #[instrument(skip(self))]
    pub async fn buffer_info(&self) -> ServiceResult<String> {
        let container = BufferService::new(self.ctx).acquire().await?;
        Ok(format!(
            "Current buffer guild: {} ({}/{CONTAINER_SLOT_LIMIT} full)",
            container.name, container.slots_used
        ))
    }

    async fn find(&self, idx: i64) -> ServiceResult<Suggestion> {
        Ok(self
            .ctx
            .suggestion_repo()
            .find_by_idx(idx)
            .await?
            .ok_or(DomainError::SuggestionNotFound(idx))?)
    }

    async fn submitter_label(&self, suggestion: &Suggestion) -> String {
        match self.ctx.transport().find_user(suggestion.user_id).await {
            Ok(Some(user)) => format!("{} {}", user.name, user.id),
            Ok(None) => suggestion.user_id.to_string(),
            Err(e) => {
                warn!(error = %e, user_id = %suggestion.user_id, "Submitter lookup failed");
                suggestion.user_id.to_string()
            }
        }
    }
}

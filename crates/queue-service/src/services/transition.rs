//! Transition coordinator
//!
//! Moves pending suggestions to the approval queue or denies them. Each
//! transition persists exactly once; the platform side effects around that
//! write are ordered so a failure before it leaves nothing behind and a
//! failure after it only costs cleanup.

use queue_core::{
    DomainError, OutgoingMessage, ResourceHandle, Snowflake, Suggestion, TransitionUpdate,
    UserHandle,
};
use tracing::{debug, error, info, instrument, warn};

use crate::text::messages;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::oplog::OperatorLog;

/// Result of a promotion attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromoteOutcome {
    /// Now in the approval queue
    Promoted(Suggestion),
    /// The uploaded emoji is gone; nothing was changed
    ResourceMissing,
}

/// Transition service
pub struct TransitionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TransitionService<'a> {
    /// Create a new TransitionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Move a pending suggestion to the public approval queue
    #[instrument(skip(self, suggestion), fields(idx = suggestion.idx))]
    pub async fn promote(
        &self,
        suggestion: &Suggestion,
        actor: Option<Snowflake>,
        reason: Option<String>,
    ) -> ServiceResult<PromoteOutcome> {
        suggestion.ensure_pending()?;

        let oplog = OperatorLog::new(self.ctx);
        let settings = self.ctx.settings();
        let transport = self.ctx.transport();

        let user = self.resolve_submitter(suggestion, "move to PQ").await;
        let Some(resource) = transport.find_resource(suggestion.emoji_id).await? else {
            warn!(emoji_id = %suggestion.emoji_id, "Uploaded emoji missing, promotion skipped");
            oplog
                .post(&messages::resource_not_found("move to PQ", suggestion))
                .await;
            return Ok(PromoteOutcome::ResourceMissing);
        };

        transport
            .deliver(
                settings.channels.council_changelog,
                &OutgoingMessage::text(format!(
                    "{} moved to <#{}>: {resource} (by <@{}>)",
                    settings.markers.approve, settings.channels.approval_queue, suggestion.user_id
                )),
            )
            .await?;

        let image = transport.fetch_image(&resource.source()).await?;
        let post = OutgoingMessage::text(format!(":{}:", suggestion.emoji_name))
            .with_file(image_filename(&resource), image);
        let public_message_id = transport
            .deliver(settings.channels.approval_queue, &post)
            .await?;

        for marker in [&settings.markers.approve, &settings.markers.deny] {
            if let Err(e) = transport
                .add_marker(settings.channels.approval_queue, public_message_id, marker)
                .await
            {
                warn!(error = %e, marker = %marker, "Failed to add vote marker");
            }
        }

        let update = TransitionUpdate::promote(public_message_id, actor, reason);
        let updated = match self
            .ctx
            .suggestion_repo()
            .record_transition(suggestion.idx, &update)
            .await
        {
            Ok(updated) => updated,
            Err(e) => {
                error!(
                    error = %e,
                    public_message_id = %public_message_id,
                    "Promotion not persisted, approval queue post is orphaned"
                );
                self.delete_quietly(settings.channels.approval_queue, public_message_id)
                    .await;
                return Err(e.into());
            }
        };

        self.delete_submission_message(suggestion).await;
        if let Some(council_message_id) = suggestion.council_message_id {
            self.delete_quietly(settings.channels.council_queue, council_message_id)
                .await;
        }
        self.delete_resource_quietly(&resource).await;

        if let Some(user) = user {
            self.notify(&user, &messages::suggestion_approved(&settings.channels), "approved")
                .await;
        }

        info!(
            public_message_id = %public_message_id,
            forced = actor.is_some(),
            "Suggestion moved to the approval queue"
        );
        Ok(PromoteOutcome::Promoted(updated))
    }

    /// Deny a pending suggestion.
    ///
    /// `revoke` marks a withdrawal by the submitter: the changelog wording
    /// changes and no DM is sent.
    #[instrument(skip(self, suggestion), fields(idx = suggestion.idx))]
    pub async fn deny(
        &self,
        suggestion: &Suggestion,
        actor: Option<Snowflake>,
        reason: Option<String>,
        revoke: bool,
    ) -> ServiceResult<Suggestion> {
        suggestion.ensure_pending()?;

        let oplog = OperatorLog::new(self.ctx);
        let settings = self.ctx.settings();
        let transport = self.ctx.transport();

        let Some(resource) = transport.find_resource(suggestion.emoji_id).await? else {
            error!(emoji_id = %suggestion.emoji_id, "Uploaded emoji missing, cannot deny");
            oplog
                .post(&messages::resource_not_found("deny", suggestion))
                .await;
            return Err(DomainError::ResourceMissing {
                idx: suggestion.idx,
                emoji_id: suggestion.emoji_id,
            }
            .into());
        };
        let user = self.resolve_submitter(suggestion, "deny").await;

        let update = TransitionUpdate::deny(actor, reason, revoke);
        let updated = self
            .ctx
            .suggestion_repo()
            .record_transition(suggestion.idx, &update)
            .await?;

        let verb = if revoke { "revoked by submitter" } else { "denied" };
        let announcement = OutgoingMessage::text(format!(
            "{} {verb}: {resource} (by <@{}>)",
            settings.markers.deny, suggestion.user_id
        ));
        if let Err(e) = transport
            .deliver(settings.channels.council_changelog, &announcement)
            .await
        {
            warn!(error = %e, "Failed to announce denial");
        }

        self.delete_submission_message(suggestion).await;
        if let Some(council_message_id) = suggestion.council_message_id {
            self.delete_quietly(settings.channels.council_queue, council_message_id)
                .await;
        }
        self.delete_resource_quietly(&resource).await;

        if !revoke {
            if let Some(user) = user {
                self.notify(&user, &messages::suggestion_denied(&settings.channels), "denied")
                    .await;
            }
        }

        info!(revoked = revoke, forced = actor.is_some(), "Suggestion denied");
        Ok(updated)
    }

    /// Withdraw a suggestion on behalf of its submitter.
    ///
    /// With an explicit idx the caller must own it; otherwise the caller's
    /// most recent suggestion is used.
    #[instrument(skip(self))]
    pub async fn revoke(&self, caller: Snowflake, idx: Option<i64>) -> ServiceResult<Suggestion> {
        let repo = self.ctx.suggestion_repo();
        let suggestion = match idx {
            Some(idx) => {
                let suggestion = repo
                    .find_by_idx(idx)
                    .await?
                    .ok_or(DomainError::SuggestionNotFound(idx))?;
                if suggestion.user_id != caller {
                    return Err(DomainError::NotSuggestionOwner(idx).into());
                }
                suggestion
            }
            None => repo
                .find_latest_by_user(caller)
                .await?
                .ok_or_else(|| ServiceError::not_found("Suggestion", format!("by user {caller}")))?,
        };

        self.deny(
            &suggestion,
            Some(caller),
            Some(messages::REVOKE_REASON.to_string()),
            true,
        )
        .await
    }

    /// Delete a suggestion's post from the approval queue.
    ///
    /// An already-absent post counts as removed.
    #[instrument(skip(self, suggestion), fields(idx = suggestion.idx))]
    pub async fn remove_from_public_queue(&self, suggestion: &Suggestion) -> ServiceResult<()> {
        let Some(message_id) = suggestion.public_message_id else {
            return Ok(());
        };

        match self
            .ctx
            .transport()
            .delete_message(self.ctx.settings().channels.approval_queue, message_id)
            .await
        {
            Ok(()) | Err(DomainError::MessageNotFound(_)) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_submitter(&self, suggestion: &Suggestion, action: &str) -> Option<UserHandle> {
        let user = match self.ctx.transport().find_user(suggestion.user_id).await {
            Ok(user) => user,
            Err(e) => {
                warn!(error = %e, user_id = %suggestion.user_id, "Submitter lookup failed");
                None
            }
        };

        if user.is_none() {
            OperatorLog::new(self.ctx)
                .post(&messages::submitter_not_found(action, suggestion))
                .await;
        }
        user
    }

    async fn delete_submission_message(&self, suggestion: &Suggestion) {
        let Some(message_id) = suggestion.suggestions_message_id else {
            debug!("No submission message recorded");
            return;
        };

        let channel = self.ctx.settings().channels.suggestions;
        match self.ctx.transport().delete_message(channel, message_id).await {
            Ok(()) | Err(DomainError::MessageNotFound(_)) => {}
            Err(e) => {
                warn!(error = %e, message_id = %message_id, "Failed to delete submission message");
                OperatorLog::new(self.ctx)
                    .post(&messages::submission_delete_failed(suggestion.idx, channel))
                    .await;
            }
        }
    }

    async fn delete_quietly(&self, channel_id: Snowflake, message_id: Snowflake) {
        match self
            .ctx
            .transport()
            .delete_message(channel_id, message_id)
            .await
        {
            Ok(()) | Err(DomainError::MessageNotFound(_)) => {}
            Err(e) => {
                warn!(error = %e, channel_id = %channel_id, message_id = %message_id, "Failed to delete message");
            }
        }
    }

    async fn delete_resource_quietly(&self, resource: &ResourceHandle) {
        if let Err(e) = self.ctx.transport().delete_resource(resource).await {
            warn!(error = %e, resource_id = %resource.id, "Failed to delete uploaded emoji");
        }
    }

    async fn notify(&self, user: &UserHandle, content: &str, verb: &str) {
        if let Err(e) = self.ctx.transport().send_direct(user.id, content).await {
            warn!(error = %e, user_id = %user.id, "Failed to DM submitter");
            OperatorLog::new(self.ctx)
                .post(&messages::dm_failed(&user.name_id(), verb))
                .await;
        }
    }
}

/// Filename for an uploaded emoji's image
pub(crate) fn image_filename(resource: &ResourceHandle) -> String {
    let ext = if resource.animated { "gif" } else { "png" };
    format!("{}.{ext}", resource.name)
}

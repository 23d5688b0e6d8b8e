//! Submission intake
//!
//! Turns an image posted in the suggestions channel into a pending
//! suggestion with its review post in the council queue.

use std::sync::LazyLock;

use queue_core::{
    Attachment, DomainError, ImageSource, NewSuggestion, OutgoingMessage, Snowflake,
    SubmissionPosted, UserHandle,
};
use regex::Regex;
use tracing::{error, info, instrument, warn};

use crate::text::{messages, neutralise_mentions};

use super::buffer::BufferService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::oplog::OperatorLog;

/// Largest accepted attachment
pub const MAX_SUBMISSION_BYTES: u64 = 256 * 1024;

/// Emoji name limit on the platform
const MAX_NAME_CHARS: usize = 32;

/// The first word-like run of the message, also matching `name:123` pastes
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w{1,32}):?\d?").expect("name regex is valid"));

/// Why a submission was turned away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No attachment, or not an accepted image type
    BadFormat,
    TooLarge,
    /// No buffer container could take the emoji
    NoBufferSlot,
    /// The image could not be downloaded or uploaded as an emoji
    UploadFailed,
}

/// What happened to a posted message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Not a submission
    Ignored,
    Rejected(RejectReason),
    /// Stored as a pending suggestion with this idx
    Accepted(i64),
}

/// Pick the emoji name: the message text first, then the filename
pub fn extract_name(content: &str, attachment: &Attachment) -> String {
    if let Some(name) = NAME_RE.captures(content).and_then(|c| c.get(1)) {
        return name.as_str().to_string();
    }
    attachment.stem().chars().take(MAX_NAME_CHARS).collect()
}

/// Submission service
pub struct SubmissionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> SubmissionService<'a> {
    /// Create a new SubmissionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    #[instrument(skip(self, event), fields(message_id = %event.message_id, author_id = %event.author_id))]
    pub async fn handle(&self, event: &SubmissionPosted) -> ServiceResult<SubmissionOutcome> {
        let settings = self.ctx.settings();
        if event.channel_id != settings.channels.suggestions
            || event.author_id == settings.bot_user_id
        {
            return Ok(SubmissionOutcome::Ignored);
        }

        let Some(attachment) = event
            .attachments
            .first()
            .filter(|a| a.is_accepted_image())
        else {
            return Ok(self
                .reject(event, RejectReason::BadFormat, messages::BAD_SUGGESTION)
                .await);
        };
        if attachment.size > MAX_SUBMISSION_BYTES {
            return Ok(self
                .reject(event, RejectReason::TooLarge, messages::SUGGESTION_TOO_LARGE)
                .await);
        }

        let transport = self.ctx.transport();
        let name = extract_name(&event.content, attachment);
        let image = match transport
            .fetch_image(&ImageSource::Url {
                url: attachment.url.clone(),
            })
            .await
        {
            Ok(image) => image,
            Err(e) => return Ok(self.upload_failed(event, "download", e).await),
        };

        let container = match BufferService::new(self.ctx).acquire().await {
            Ok(container) => container,
            Err(e) => {
                warn!(error = %e, "No buffer container available for submission");
                OperatorLog::new(self.ctx).post(messages::NO_BUFFER_SLOTS).await;
                return Ok(self
                    .reject(event, RejectReason::NoBufferSlot, messages::BOT_BROKEN)
                    .await);
            }
        };

        let resource = match transport
            .create_resource(container.id, &name, &image, attachment.is_animated())
            .await
        {
            Ok(resource) => resource,
            Err(e) => return Ok(self.upload_failed(event, "upload", e).await),
        };

        let council_queue = settings.channels.council_queue;
        let council_message_id = match transport
            .deliver(council_queue, &OutgoingMessage::text(resource.to_string()))
            .await
        {
            Ok(id) => id,
            Err(e) => {
                self.discard_resource(&resource).await;
                return Err(e.into());
            }
        };
        for marker in [&settings.markers.approve, &settings.markers.deny] {
            if let Err(e) = transport
                .add_marker(council_queue, council_message_id, marker)
                .await
            {
                warn!(error = %e, marker = %marker, "Failed to add vote marker");
            }
        }

        let new = NewSuggestion {
            user_id: event.author_id,
            council_message_id,
            emoji_id: resource.id,
            emoji_name: name.clone(),
            emoji_animated: resource.animated,
            note: Some(event.content.clone()).filter(|c| !c.trim().is_empty()),
            suggestions_message_id: Some(event.message_id),
        };
        let idx = match self.ctx.suggestion_repo().create(&new).await {
            Ok(idx) => idx,
            Err(e) => {
                error!(error = %e, "Failed to store submission, rolling back its posts");
                if let Err(e) = transport.delete_message(council_queue, council_message_id).await {
                    warn!(error = %e, "Failed to delete council queue post");
                }
                self.discard_resource(&resource).await;
                return Err(e.into());
            }
        };

        let author = UserHandle {
            id: event.author_id,
            name: event.author_name.clone(),
        };
        let log_entry = OutgoingMessage::text(neutralise_mentions(&format!(
            "**Submission #{idx}**\n\n:{name}: by `{}`\nFilename: {}",
            author.name_id(),
            attachment.filename
        )))
        .with_file(attachment.filename.clone(), image);
        if let Err(e) = transport
            .deliver(settings.channels.suggestions_log, &log_entry)
            .await
        {
            warn!(error = %e, idx, "Failed to archive submission");
        }

        self.respond(event.author_id, messages::SUGGESTION_RECEIVED)
            .await;

        info!(idx, name = %name, animated = resource.animated, "Submission queued for review");
        Ok(SubmissionOutcome::Accepted(idx))
    }

    async fn upload_failed(
        &self,
        event: &SubmissionPosted,
        step: &str,
        err: DomainError,
    ) -> SubmissionOutcome {
        error!(error = %err, step, "Submitted image could not be processed");
        OperatorLog::new(self.ctx)
            .post(&messages::submission_upload_failed(step, event.author_id))
            .await;
        self.reject(event, RejectReason::UploadFailed, messages::BOT_BROKEN)
            .await
    }

    async fn reject(
        &self,
        event: &SubmissionPosted,
        reason: RejectReason,
        reply: &str,
    ) -> SubmissionOutcome {
        info!(?reason, "Submission rejected");
        match self
            .ctx
            .transport()
            .delete_message(event.channel_id, event.message_id)
            .await
        {
            Ok(()) | Err(DomainError::MessageNotFound(_)) => {}
            Err(e) => warn!(error = %e, "Failed to delete rejected submission"),
        }
        self.respond(event.author_id, reply).await;
        SubmissionOutcome::Rejected(reason)
    }

    /// DM the submitter, falling back to a mention in the suggestions channel
    async fn respond(&self, user_id: Snowflake, text: &str) {
        let transport = self.ctx.transport();
        if transport.send_direct(user_id, text).await.is_ok() {
            return;
        }

        let fallback = OutgoingMessage::text(format!("<@{user_id}>: {text}"));
        if let Err(e) = transport
            .deliver(self.ctx.settings().channels.suggestions, &fallback)
            .await
        {
            warn!(error = %e, user_id = %user_id, "Could not reach submitter");
        }
    }

    async fn discard_resource(&self, resource: &queue_core::ResourceHandle) {
        if let Err(e) = self.ctx.transport().delete_resource(resource).await {
            warn!(error = %e, resource_id = %resource.id, "Failed to delete uploaded emoji");
        }
    }
}

//! Operator log - alerts posted to the bot log channel

use chrono::{DateTime, Utc};
use queue_core::OutgoingMessage;
use tracing::warn;

use super::context::ServiceContext;

/// Prefix an alert with its `[HH:MM]` UTC time
pub fn timestamped(text: &str, now: DateTime<Utc>) -> String {
    format!("`[{}]` {text}", now.format("%H:%M"))
}

/// Posts operator-visible alerts.
///
/// Posting never fails the caller; a lost alert is only logged.
pub struct OperatorLog<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> OperatorLog<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    pub async fn post(&self, text: &str) {
        let channel = self.ctx.settings().channels.bot_log;
        let message = OutgoingMessage::text(timestamped(text, Utc::now()));

        if let Err(e) = self.ctx.transport().deliver(channel, &message).await {
            warn!(error = %e, alert = text, "Failed to post to operator log");
        }
    }
}

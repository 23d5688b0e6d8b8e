//! Pending yes/no prompts keyed by the prompt message id

use std::sync::Arc;

use dashmap::DashMap;
use queue_core::{Marker, MarkerEvent, MarkerKind, Snowflake};
use tokio::sync::oneshot;
use tracing::debug;

/// Marker that accepts a prompt
pub const CONFIRM_MARKER: &str = "\u{2705}";
/// Marker that declines a prompt
pub const DECLINE_MARKER: &str = "\u{274C}";

struct Waiter {
    actor_id: Snowflake,
    reply: oneshot::Sender<bool>,
}

/// Registry of prompts waiting on a specific user's answer
#[derive(Default)]
pub struct ConfirmationRegistry {
    pending: DashMap<Snowflake, Waiter>,
}

impl ConfirmationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unanswered prompts
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Start waiting for `actor_id` to answer the prompt `message_id`.
    ///
    /// Dropping the returned handle withdraws the prompt.
    pub fn register(self: &Arc<Self>, message_id: Snowflake, actor_id: Snowflake) -> PendingConfirmation {
        let (reply, answer) = oneshot::channel();
        self.pending.insert(message_id, Waiter { actor_id, reply });
        PendingConfirmation {
            registry: Arc::clone(self),
            message_id,
            answer,
        }
    }

    /// Answer a prompt from a marker event.
    ///
    /// Returns `true` when the event was consumed as an answer; everything
    /// else (other users, other markers, removals) is left for vote handling.
    pub fn resolve(&self, event: &MarkerEvent) -> bool {
        if event.kind != MarkerKind::Added {
            return false;
        }
        let answer = match &event.marker {
            Marker::Unicode(value) if value == CONFIRM_MARKER => true,
            Marker::Unicode(value) if value == DECLINE_MARKER => false,
            _ => return false,
        };

        let Some((_, waiter)) = self
            .pending
            .remove_if(&event.message_id, |_, waiter| waiter.actor_id == event.user_id)
        else {
            return false;
        };

        // The waiter may have given up already
        let _ = waiter.reply.send(answer);
        debug!(message_id = %event.message_id, confirmed = answer, "Prompt answered");
        true
    }
}

/// A registered prompt; resolves to the user's answer
pub struct PendingConfirmation {
    registry: Arc<ConfirmationRegistry>,
    message_id: Snowflake,
    answer: oneshot::Receiver<bool>,
}

impl PendingConfirmation {
    pub fn message_id(&self) -> Snowflake {
        self.message_id
    }

    /// Wait for the answer. A withdrawn prompt counts as declined.
    pub async fn wait(mut self) -> bool {
        (&mut self.answer).await.unwrap_or(false)
    }
}

impl Drop for PendingConfirmation {
    fn drop(&mut self) {
        self.registry.pending.remove(&self.message_id);
    }
}

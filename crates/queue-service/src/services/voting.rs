//! Vote tally engine
//!
//! Turns approve/deny marker events on queue messages into counter updates,
//! reviewer stances and, once a threshold is crossed, a transition.

use queue_core::{MarkerEvent, Suggestion, Verdict, VoteDelta};
use tracing::{debug, info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::transition::{PromoteOutcome, TransitionService};

/// Why an event was dropped without touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The bot's own markers on its posts
    OwnMarker,
    NotVoteMarker,
    UntrackedChannel,
    /// The message is not a queue post of any suggestion
    UnknownMessage,
}

/// What processing a marker event did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteOutcome {
    Ignored(IgnoreReason),
    /// Counted, no transition
    Recorded(Suggestion),
    Promoted(Suggestion),
    Denied(Suggestion),
}

/// Voting service
pub struct VotingService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> VotingService<'a> {
    /// Create a new VotingService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Process one marker added or removed event.
    ///
    /// Everything from the counter update through any resulting transition
    /// runs under the vote lock.
    #[instrument(skip(self, event), fields(message_id = %event.message_id, user_id = %event.user_id, kind = ?event.kind))]
    pub async fn handle_marker(&self, event: &MarkerEvent) -> ServiceResult<VoteOutcome> {
        let settings = self.ctx.settings();

        if event.user_id == settings.bot_user_id {
            return Ok(ignored(IgnoreReason::OwnMarker));
        }
        let Some(vote) = settings.markers.classify(&event.marker) else {
            return Ok(ignored(IgnoreReason::NotVoteMarker));
        };
        if !settings.channels.is_vote_channel(event.channel_id) {
            return Ok(ignored(IgnoreReason::UntrackedChannel));
        }

        let _lock = self.ctx.guard().lock_votes().await;

        let repo = self.ctx.suggestion_repo();
        let Some(suggestion) = repo.find_by_message(event.message_id).await? else {
            return Ok(ignored(IgnoreReason::UnknownMessage));
        };

        let delta = VoteDelta::from(event.kind);
        let suggestion = repo
            .apply_vote_delta(suggestion.idx, vote, delta.amount())
            .await?;
        debug!(
            idx = suggestion.idx,
            upvotes = suggestion.upvotes,
            downvotes = suggestion.downvotes,
            "Vote counted"
        );

        if !suggestion.is_pending() {
            return Ok(VoteOutcome::Recorded(suggestion));
        }

        self.ctx
            .vote_repo()
            .upsert_stance(suggestion.idx, event.user_id, vote, delta.stance())
            .await?;

        let transitions = TransitionService::new(self.ctx);
        match settings
            .voting
            .evaluate(suggestion.upvotes, suggestion.downvotes)
        {
            Some(Verdict::Approve) => {
                info!(idx = suggestion.idx, "Approval threshold reached");
                let reset = repo.reset_votes(suggestion.idx).await?;
                match transitions.promote(&reset, None, None).await? {
                    PromoteOutcome::Promoted(promoted) => Ok(VoteOutcome::Promoted(promoted)),
                    PromoteOutcome::ResourceMissing => Ok(VoteOutcome::Recorded(reset)),
                }
            }
            Some(Verdict::Deny) => {
                info!(idx = suggestion.idx, "Denial threshold reached");
                let denied = transitions.deny(&suggestion, None, None, false).await?;
                Ok(VoteOutcome::Denied(denied))
            }
            None => Ok(VoteOutcome::Recorded(suggestion)),
        }
    }
}

fn ignored(reason: IgnoreReason) -> VoteOutcome {
    debug!(?reason, "Marker event ignored");
    VoteOutcome::Ignored(reason)
}

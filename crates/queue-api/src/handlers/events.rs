//! Platform event intake
//!
//! The gateway side forwards message and reaction events here. Each event is
//! processed on its own task, so a caller hanging up cannot cut a transition
//! short. The reply is sent once processing ends and says what it did.

use axum::extract::State;
use queue_core::{MarkerEvent, SubmissionPosted};
use queue_service::dto::MessageResponse;
use queue_service::{SubmissionOutcome, SubmissionService, VoteOutcome, VotingService};
use tracing::instrument;

use super::detached;
use crate::extractors::JsonBody;
use crate::response::{Accepted, ApiResult};
use crate::state::AppState;

/// A message was posted in a watched channel
///
/// POST /events/submissions
#[instrument(skip_all, fields(message_id = %event.message_id))]
pub async fn submission_posted(
    State(state): State<AppState>,
    JsonBody(event): JsonBody<SubmissionPosted>,
) -> ApiResult<Accepted<MessageResponse>> {
    let outcome = detached(&state, |ctx| async move {
        SubmissionService::new(&ctx).handle(&event).await
    })
    .await?;

    Ok(Accepted(MessageResponse::new(describe_submission(outcome))))
}

/// A reaction was added or removed
///
/// POST /events/markers
#[instrument(skip_all, fields(message_id = %event.message_id, kind = ?event.kind))]
pub async fn marker_changed(
    State(state): State<AppState>,
    JsonBody(event): JsonBody<MarkerEvent>,
) -> ApiResult<Accepted<MessageResponse>> {
    if state.confirmations().resolve(&event) {
        return Ok(Accepted(MessageResponse::new("Confirmation recorded")));
    }

    let outcome = detached(&state, |ctx| async move {
        VotingService::new(&ctx).handle_marker(&event).await
    })
    .await?;

    Ok(Accepted(MessageResponse::new(describe_vote(&outcome))))
}

fn describe_submission(outcome: SubmissionOutcome) -> String {
    match outcome {
        SubmissionOutcome::Ignored => "Ignored".to_string(),
        SubmissionOutcome::Rejected(reason) => format!("Rejected: {reason:?}"),
        SubmissionOutcome::Accepted(idx) => format!("Accepted as #{idx}"),
    }
}

fn describe_vote(outcome: &VoteOutcome) -> String {
    match outcome {
        VoteOutcome::Ignored(reason) => format!("Ignored: {reason:?}"),
        VoteOutcome::Recorded(s) => format!(
            "Recorded on #{} (\u{25B2} {} / \u{25BC} {})",
            s.idx, s.upvotes, s.downvotes
        ),
        VoteOutcome::Promoted(s) => format!("#{} moved to the approval queue", s.idx),
        VoteOutcome::Denied(s) => format!("#{} denied", s.idx),
    }
}

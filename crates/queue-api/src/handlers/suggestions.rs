//! Suggestion handlers
//!
//! Operator commands on single suggestions, listing, and self-revocation.
//! Commands that transition a suggestion run on their own task.

use axum::{extract::State, Json};
use queue_core::DomainError;
use queue_service::dto::{
    ListSuggestionsQuery, MessageResponse, RevokeRequest, SuggestionResponse, TransitionRequest,
};
use queue_service::CommandService;

use super::detached;
use crate::extractors::{IdxPath, ValidatedJson, ValidatedQuery};
use crate::response::ApiResult;
use crate::state::AppState;

/// Force a suggestion into the approval queue
///
/// POST /suggestions/{idx}/promote
pub async fn promote_suggestion(
    State(state): State<AppState>,
    IdxPath(idx): IdxPath,
    ValidatedJson(req): ValidatedJson<TransitionRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = detached(&state, move |ctx| async move {
        CommandService::new(&ctx).promote(req.actor_id, idx, req.reason).await
    })
    .await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Force-deny a suggestion
///
/// POST /suggestions/{idx}/deny
pub async fn deny_suggestion(
    State(state): State<AppState>,
    IdxPath(idx): IdxPath,
    ValidatedJson(req): ValidatedJson<TransitionRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = detached(&state, move |ctx| async move {
        CommandService::new(&ctx).deny(req.actor_id, idx, req.reason).await
    })
    .await?;
    Ok(Json(MessageResponse::new(message)))
}

/// Get a suggestion and its status
///
/// GET /suggestions/{idx}
pub async fn get_suggestion(
    State(state): State<AppState>,
    IdxPath(idx): IdxPath,
) -> ApiResult<Json<SuggestionResponse>> {
    let suggestion = state
        .service_context()
        .suggestion_repo()
        .find_by_idx(idx)
        .await?
        .ok_or(DomainError::SuggestionNotFound(idx))?;
    Ok(Json(SuggestionResponse::from(&suggestion)))
}

/// Table of recent suggestions
///
/// GET /suggestions?limit=
pub async fn list_suggestions(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<ListSuggestionsQuery>,
) -> ApiResult<Json<MessageResponse>> {
    let table = CommandService::new(state.service_context())
        .list_recent(query.limit)
        .await?;
    Ok(Json(MessageResponse::new(table)))
}

/// Withdraw the caller's own suggestion
///
/// POST /suggestions/revoke
pub async fn revoke_suggestion(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<RevokeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = detached(&state, move |ctx| async move {
        CommandService::new(&ctx).revoke(req.caller_id, req.idx).await
    })
    .await?;
    Ok(Json(MessageResponse::new(message)))
}

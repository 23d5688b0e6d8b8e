//! Comparison handler

use axum::{extract::State, Json};
use queue_service::dto::{ComparisonRequest, MessageResponse};
use queue_service::CommandService;

use super::detached;
use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Start a comparison; answers once it is posted, cancelled or rejected
///
/// POST /comparisons
pub async fn create_comparison(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<ComparisonRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let message = detached(&state, move |ctx| async move {
        CommandService::new(&ctx)
            .vs(req.actor_id, req.channel_id, &req.options)
            .await
    })
    .await?;
    Ok(Json(MessageResponse::new(message)))
}

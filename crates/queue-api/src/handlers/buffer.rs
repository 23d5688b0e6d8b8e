//! Buffer container handler

use axum::{extract::State, Json};
use queue_service::dto::MessageResponse;
use queue_service::CommandService;

use super::detached;
use crate::response::ApiResult;
use crate::state::AppState;

/// The container the next upload goes to
///
/// GET /buffer
pub async fn buffer_info(State(state): State<AppState>) -> ApiResult<Json<MessageResponse>> {
    // May create a new container
    let message = detached(&state, |ctx| async move {
        CommandService::new(&ctx).buffer_info().await
    })
    .await?;
    Ok(Json(MessageResponse::new(message)))
}

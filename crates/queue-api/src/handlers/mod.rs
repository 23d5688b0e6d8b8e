//! Route handlers
//!
//! All HTTP request handlers organized by domain.

pub mod buffer;
pub mod comparisons;
pub mod events;
pub mod health;
pub mod suggestions;

use std::future::Future;
use std::sync::Arc;

use queue_service::{ServiceContext, ServiceError, ServiceResult};
use tracing::Instrument;

use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Run `work` on a detached task and wait for its result.
///
/// Anything that can start a transition goes through here: once spawned the
/// task runs to completion even if the request is dropped or times out.
pub(crate) async fn detached<T, F, Fut>(state: &AppState, work: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(Arc<ServiceContext>) -> Fut,
    Fut: Future<Output = ServiceResult<T>> + Send + 'static,
{
    tokio::spawn(work(state.shared_context()).in_current_span())
        .await
        .map_err(|e| ServiceError::internal(format!("handler task failed: {e}")))?
        .map_err(ApiError::from)
}

//! Route definitions
//!
//! API routes are mounted under /api/v1; health probes sit at the root.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{buffer, comparisons, events, health, suggestions};
use crate::state::AppState;

/// Create the main API router with all routes
pub fn create_router() -> Router<AppState> {
    Router::new()
        .merge(health_routes())
        .nest("/api/v1", api_v1_routes())
}

/// Health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API v1 routes
fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .merge(event_routes())
        .merge(suggestion_routes())
        .merge(command_routes())
}

/// Platform event intake
fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/events/submissions", post(events::submission_posted))
        .route("/events/markers", post(events::marker_changed))
}

/// Suggestion routes
fn suggestion_routes() -> Router<AppState> {
    Router::new()
        .route("/suggestions", get(suggestions::list_suggestions))
        .route("/suggestions/revoke", post(suggestions::revoke_suggestion))
        .route("/suggestions/:idx", get(suggestions::get_suggestion))
        .route("/suggestions/:idx/promote", post(suggestions::promote_suggestion))
        .route("/suggestions/:idx/deny", post(suggestions::deny_suggestion))
}

/// Other operator commands
fn command_routes() -> Router<AppState> {
    Router::new()
        .route("/comparisons", post(comparisons::create_comparison))
        .route("/buffer", get(buffer::buffer_info))
}

//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use queue_common::{AppConfig, AppError};
use queue_core::{CouncilVoteRepository, SuggestionRepository};
use queue_db::{
    create_pool, run_migrations, InMemoryStore, PgCouncilVoteRepository, PgPool,
    PgSuggestionRepository, PoolConfig,
};
use queue_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::middleware::{apply_middleware, request_timeout};
use crate::routes::create_router;
use crate::state::AppState;
use crate::transport::{ConfirmationRegistry, HttpTransport};

type Store = (
    Arc<dyn SuggestionRepository>,
    Arc<dyn CouncilVoteRepository>,
    Option<PgPool>,
);

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let timeout = request_timeout(&state.config().queue.comparison);
    let router = create_router();
    let router = apply_middleware(router, timeout);
    router.with_state(state)
}

/// PostgreSQL when configured, otherwise the in-memory store
async fn open_store(config: &AppConfig) -> Result<Store, AppError> {
    let Some(database) = &config.database else {
        warn!("DATABASE_URL not set, suggestions are kept in memory and lost on restart");
        let store = Arc::new(InMemoryStore::new());
        let suggestion_repo: Arc<dyn SuggestionRepository> = store.clone();
        let vote_repo: Arc<dyn CouncilVoteRepository> = store;
        return Ok((suggestion_repo, vote_repo, None));
    };

    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&PoolConfig::from(database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    let suggestion_repo: Arc<dyn SuggestionRepository> =
        Arc::new(PgSuggestionRepository::new(pool.clone()));
    let vote_repo: Arc<dyn CouncilVoteRepository> =
        Arc::new(PgCouncilVoteRepository::new(pool.clone()));
    Ok((suggestion_repo, vote_repo, Some(pool)))
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    let (suggestion_repo, vote_repo, pool) = open_store(&config).await?;

    let confirmations = Arc::new(ConfirmationRegistry::new());
    let transport = HttpTransport::new(&config.platform, Arc::clone(&confirmations))
        .map_err(AppError::internal)?;
    info!(api_base = %config.platform.api_base, "Platform transport ready");

    let service_context = ServiceContextBuilder::new()
        .suggestion_repo(suggestion_repo)
        .vote_repo(vote_repo)
        .transport(Arc::new(transport))
        .settings(config.queue.clone())
        .build()?;

    Ok(AppState::new(service_context, config, pool, confirmations))
}

/// Run the HTTP server until Ctrl-C
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(anyhow::anyhow!("Server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config.api.address().parse().map_err(|e| {
        AppError::validation(format!("Invalid listen address {}: {e}", config.api.address()))
    })?;

    let state = create_app_state(config).await?;
    let app = create_app(state);

    run_server(app, addr).await
}

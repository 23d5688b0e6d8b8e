//! Application state
//!
//! Holds the shared state for the Axum application: the service context,
//! configuration, the optional database pool and the registry of pending
//! comparison confirmations.

use std::sync::Arc;

use queue_common::AppConfig;
use queue_db::PgPool;
use queue_service::ServiceContext;

use crate::transport::ConfirmationRegistry;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Service context containing all dependencies
    service_context: Arc<ServiceContext>,
    /// Application configuration
    config: Arc<AppConfig>,
    /// `None` when running on the in-memory store
    pool: Option<PgPool>,
    confirmations: Arc<ConfirmationRegistry>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        service_context: ServiceContext,
        config: AppConfig,
        pool: Option<PgPool>,
        confirmations: Arc<ConfirmationRegistry>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            pool,
            confirmations,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Owned handle to the service context, for work that outlives a request
    pub fn shared_context(&self) -> Arc<ServiceContext> {
        Arc::clone(&self.service_context)
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Pending comparison confirmations
    pub fn confirmations(&self) -> &ConfirmationRegistry {
        &self.confirmations
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("persistent", &self.pool.is_some())
            .field("pending_confirmations", &self.confirmations.len())
            .finish()
    }
}

//! Service context - dependency container for services
//!
//! Holds the store ports, the messaging transport, the queue settings and the
//! shared concurrency guard.

use std::sync::Arc;

use queue_common::QueueSettings;
use queue_core::traits::{CouncilVoteRepository, MessagingTransport, SuggestionRepository};

use super::error::{ServiceError, ServiceResult};
use super::guard::ConcurrencyGuard;

/// Service context containing all dependencies
///
/// Cloning is cheap; every clone shares the same guard, so vote processing
/// stays serialized across all request handlers.
#[derive(Clone)]
pub struct ServiceContext {
    // Store
    suggestion_repo: Arc<dyn SuggestionRepository>,
    vote_repo: Arc<dyn CouncilVoteRepository>,

    // Platform
    transport: Arc<dyn MessagingTransport>,

    settings: Arc<QueueSettings>,
    guard: Arc<ConcurrencyGuard>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        suggestion_repo: Arc<dyn SuggestionRepository>,
        vote_repo: Arc<dyn CouncilVoteRepository>,
        transport: Arc<dyn MessagingTransport>,
        settings: Arc<QueueSettings>,
        guard: Arc<ConcurrencyGuard>,
    ) -> Self {
        Self {
            suggestion_repo,
            vote_repo,
            transport,
            settings,
            guard,
        }
    }

    // === Store ===

    /// Get the suggestion repository
    pub fn suggestion_repo(&self) -> &dyn SuggestionRepository {
        self.suggestion_repo.as_ref()
    }

    /// Get the council vote repository
    pub fn vote_repo(&self) -> &dyn CouncilVoteRepository {
        self.vote_repo.as_ref()
    }

    // === Platform ===

    /// Get the messaging transport
    pub fn transport(&self) -> &dyn MessagingTransport {
        self.transport.as_ref()
    }

    // === Settings ===

    pub fn settings(&self) -> &QueueSettings {
        self.settings.as_ref()
    }

    /// Get the vote and comparison locks
    pub fn guard(&self) -> &ConcurrencyGuard {
        self.guard.as_ref()
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("transport", &"...")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for creating ServiceContext
#[derive(Default)]
pub struct ServiceContextBuilder {
    suggestion_repo: Option<Arc<dyn SuggestionRepository>>,
    vote_repo: Option<Arc<dyn CouncilVoteRepository>>,
    transport: Option<Arc<dyn MessagingTransport>>,
    settings: Option<Arc<QueueSettings>>,
    guard: Option<Arc<ConcurrencyGuard>>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suggestion_repo(mut self, repo: Arc<dyn SuggestionRepository>) -> Self {
        self.suggestion_repo = Some(repo);
        self
    }

    pub fn vote_repo(mut self, repo: Arc<dyn CouncilVoteRepository>) -> Self {
        self.vote_repo = Some(repo);
        self
    }

    pub fn transport(mut self, transport: Arc<dyn MessagingTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn settings(mut self, settings: QueueSettings) -> Self {
        self.settings = Some(Arc::new(settings));
        self
    }

    /// Share an existing guard (defaults to a fresh one)
    pub fn guard(mut self, guard: Arc<ConcurrencyGuard>) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.suggestion_repo
                .ok_or_else(|| ServiceError::validation("suggestion_repo is required"))?,
            self.vote_repo
                .ok_or_else(|| ServiceError::validation("vote_repo is required"))?,
            self.transport
                .ok_or_else(|| ServiceError::validation("transport is required"))?,
            self.settings
                .ok_or_else(|| ServiceError::validation("settings is required"))?,
            self.guard.unwrap_or_default(),
        ))
    }
}

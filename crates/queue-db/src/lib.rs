//! # queue-db
//!
//! Storage layer implementing the suggestion store ports.
//!
//! ## Overview
//!
//! - Connection pool management and schema migrations (PostgreSQL via SQLx)
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers (rows are validated once, on the way in)
//! - PostgreSQL repositories, and an in-memory store for tests and
//!   database-less runs
//!
//! ## Usage
//!
//! ```rust,ignore
//! use queue_db::{create_pool, run_migrations, PgSuggestionRepository, PoolConfig};
//!
//! async fn example(url: &str) -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&PoolConfig::new(url)).await?;
//!     run_migrations(&pool).await?;
//!     let suggestions = PgSuggestionRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{create_pool, run_migrations, PgPool, PoolConfig};
pub use repositories::{InMemoryStore, PgCouncilVoteRepository, PgSuggestionRepository};

//! Business logic services
//!
//! Every service borrows a [`ServiceContext`] and talks to the outside world
//! only through the store and transport ports it holds.

pub mod buffer;
pub mod command;
pub mod comparison;
pub mod context;
pub mod error;
pub mod guard;
pub mod oplog;
pub mod submission;
pub mod transition;
pub mod voting;

// Re-export all services for convenience
pub use buffer::BufferService;
pub use command::CommandService;
pub use comparison::{ComparisonOutcome, ComparisonRef, ComparisonService};
pub use context::{ServiceContext, ServiceContextBuilder};
pub use error::{ServiceError, ServiceResult};
pub use guard::ConcurrencyGuard;
pub use oplog::OperatorLog;
pub use submission::{RejectReason, SubmissionOutcome, SubmissionService};
pub use transition::{PromoteOutcome, TransitionService};
pub use voting::{IgnoreReason, VoteOutcome, VotingService};

//! # queue-service
//!
//! Application layer: vote tallying, queue transitions, submission intake,
//! the comparison workflow and the operator commands built on top of them.

pub mod dto;
pub mod services;
pub mod text;

pub use services::{
    BufferService, CommandService, ComparisonOutcome, ComparisonRef, ComparisonService,
    ConcurrencyGuard, IgnoreReason, OperatorLog, PromoteOutcome, RejectReason, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, SubmissionOutcome, SubmissionService,
    TransitionService, VoteOutcome, VotingService,
};

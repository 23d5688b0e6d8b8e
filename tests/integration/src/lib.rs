//! Integration test utilities for the emoji queue
//!
//! A recording fake of the messaging platform, a harness wiring it to the
//! in-memory store, and a helper for running the HTTP API on a local port.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;

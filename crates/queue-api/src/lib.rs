//! # queue-api
//!
//! HTTP surface of the emoji queue: platform events come in, operator
//! commands are served, and every platform side effect goes out through the
//! REST transport.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod transport;

pub use server::{create_app, run};
pub use state::AppState;

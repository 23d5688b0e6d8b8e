//! User-facing text: canned replies and plain-text table rendering

pub mod formatting;
pub mod messages;

pub use formatting::{neutralise_mentions, Table};

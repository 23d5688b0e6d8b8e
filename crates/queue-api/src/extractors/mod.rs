//! Axum extractors for request handling

mod path;
mod validated;

pub use path::IdxPath;
pub use validated::{JsonBody, ValidatedJson, ValidatedQuery};

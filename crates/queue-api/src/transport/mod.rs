//! Platform REST transport
//!
//! [`HttpTransport`] implements the messaging port against a
//! Discord-compatible REST API. Comparison confirmations are answered by
//! marker events arriving on the HTTP intake and routed through the
//! [`ConfirmationRegistry`].

mod confirmations;
mod http;

pub use confirmations::{ConfirmationRegistry, PendingConfirmation, CONFIRM_MARKER, DECLINE_MARKER};
pub use http::{image_data_uri, sniff_image_mime, HttpTransport};

//! Queue events - what the gateway tells us happened on the platform

use serde::{Deserialize, Serialize};

use crate::entities::Attachment;
use crate::value_objects::{Marker, Snowflake, VoteDelta};

/// Whether a marker was placed or taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Added,
    Removed,
}

impl From<MarkerKind> for VoteDelta {
    fn from(kind: MarkerKind) -> Self {
        match kind {
            MarkerKind::Added => Self::Cast,
            MarkerKind::Removed => Self::Revoke,
        }
    }
}

/// A reaction was added to or removed from a message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerEvent {
    pub kind: MarkerKind,
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub user_id: Snowflake,
    pub marker: Marker,
}

/// A message was posted in a channel the bot watches
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionPosted {
    pub message_id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub author_name: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

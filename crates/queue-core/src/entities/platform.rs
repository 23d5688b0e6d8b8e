//! Platform-side objects the queue works with: attachments, uploaded emoji,
//! users and the buffer containers emoji are staged in.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::Snowflake;

/// Emoji slots available in one buffer container
pub const CONTAINER_SLOT_LIMIT: usize = 50;

/// Containers the bot may own at once
pub const MAX_OWNED_CONTAINERS: usize = 10;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "gif"];

/// File attached to a submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Snowflake,
    pub filename: String,
    pub url: String,
    /// Size in bytes
    pub size: u64,
}

impl Attachment {
    /// Lowercased file extension, if any
    pub fn extension(&self) -> Option<String> {
        self.filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }

    /// Check if the file is an image format emoji can be made from
    pub fn is_accepted_image(&self) -> bool {
        self.extension()
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
    }

    #[inline]
    pub fn is_animated(&self) -> bool {
        self.extension().as_deref() == Some("gif")
    }

    /// Filename with the extension removed
    pub fn stem(&self) -> &str {
        self.filename
            .rsplit_once('.')
            .map_or(self.filename.as_str(), |(stem, _)| stem)
    }
}

/// File sent along with a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Message to deliver to a channel
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutgoingMessage {
    pub content: String,
    pub file: Option<FileUpload>,
}

impl OutgoingMessage {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            file: None,
        }
    }

    pub fn with_file(mut self, filename: impl Into<String>, data: Vec<u8>) -> Self {
        self.file = Some(FileUpload {
            filename: filename.into(),
            data,
        });
        self
    }
}

/// An emoji uploaded to a buffer container
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceHandle {
    pub id: Snowflake,
    pub container_id: Snowflake,
    pub name: String,
    pub animated: bool,
}

impl ResourceHandle {
    /// Where to download the image from
    pub fn source(&self) -> ImageSource {
        ImageSource::Resource {
            id: self.id,
            animated: self.animated,
        }
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.animated { "a" } else { "" };
        write!(f, "<{prefix}:{}:{}>", self.name, self.id)
    }
}

/// Where image bytes can be fetched from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ImageSource {
    /// An uploaded emoji, fetched from the CDN
    Resource { id: Snowflake, animated: bool },
    /// Any external image
    Url { url: String },
}

/// A platform user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserHandle {
    pub id: Snowflake,
    pub name: String,
}

impl UserHandle {
    /// `name id`, with grave accents swapped so the text is safe inside code spans
    pub fn name_id(&self) -> String {
        format!("{} {}", self.name, self.id).replace('`', "\u{02CB}")
    }

    pub fn mention(&self) -> String {
        format!("<@{}>", self.id)
    }
}

/// A guild owned by the bot used to stage emoji
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferContainer {
    pub id: Snowflake,
    pub name: String,
    pub slots_used: usize,
}

impl BufferContainer {
    #[inline]
    pub fn has_free_slot(&self) -> bool {
        self.slots_used < CONTAINER_SLOT_LIMIT
    }
}

//! Reaction marker - the emoji a message is reacted with

use serde::{Deserialize, Serialize};
use std::fmt;

use super::Snowflake;

/// A reaction marker, either a custom emoji or a unicode emoji
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Marker {
    Custom { id: Snowflake, name: String },
    Unicode(String),
}

impl Marker {
    /// Create a custom emoji marker
    pub fn custom(id: Snowflake, name: impl Into<String>) -> Self {
        Self::Custom {
            id,
            name: name.into(),
        }
    }

    /// Create a unicode emoji marker
    pub fn unicode(value: impl Into<String>) -> Self {
        Self::Unicode(value.into())
    }

    /// Parse the `name:id` representation used in configuration.
    ///
    /// Anything without a numeric id after the last colon is treated as a
    /// unicode emoji.
    pub fn parse(repr: &str) -> Self {
        let repr = repr.trim().trim_start_matches('<').trim_end_matches('>');
        let repr = repr.strip_prefix("a:").unwrap_or(repr);
        let repr = repr.strip_prefix(':').unwrap_or(repr);

        if let Some((name, id)) = repr.rsplit_once(':') {
            if let Ok(id) = Snowflake::parse(id) {
                return Self::custom(id, name);
            }
        }

        Self::unicode(repr)
    }

    /// Custom emoji id, if any
    pub fn id(&self) -> Option<Snowflake> {
        match self {
            Self::Custom { id, .. } => Some(*id),
            Self::Unicode(_) => None,
        }
    }

    /// Value used in reaction endpoints (`name:id` or the raw unicode)
    pub fn api_value(&self) -> String {
        match self {
            Self::Custom { id, name } => format!("{name}:{id}"),
            Self::Unicode(value) => value.clone(),
        }
    }

    /// The regional indicator letter for option `index` (A = 0).
    ///
    /// Returns `None` past Z.
    pub fn option_letter(index: usize) -> Option<Self> {
        let index = u32::try_from(index).ok().filter(|i| *i < 26)?;
        char::from_u32(0x1F1E6 + index).map(|c| Self::Unicode(c.to_string()))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { id, name } => write!(f, "<:{name}:{id}>"),
            Self::Unicode(value) => f.write_str(value),
        }
    }
}

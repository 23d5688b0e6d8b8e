//! Suggestion entity - one submitted emoji and its position in the review pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Lifecycle state, derived from `council_approved`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionState {
    /// In the private council queue
    Pending,
    /// Moved to the public approval queue
    Public,
    /// Denied or revoked
    Denied,
}

impl SuggestionState {
    pub const fn from_council_approved(value: Option<bool>) -> Self {
        match value {
            None => Self::Pending,
            Some(true) => Self::Public,
            Some(false) => Self::Denied,
        }
    }

    #[inline]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// Short label used in listings
    pub const fn queue_label(self) -> &'static str {
        match self {
            Self::Pending => "CQ",
            Self::Public => "AQ",
            Self::Denied => "Denied",
        }
    }
}

impl fmt::Display for SuggestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pending => "pending",
            Self::Public => "public",
            Self::Denied => "denied",
        })
    }
}

/// Suggestion entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Suggestion {
    pub idx: i64,
    pub user_id: Snowflake,
    pub emoji_id: Snowflake,
    pub emoji_name: String,
    pub emoji_animated: bool,
    pub note: Option<String>,
    pub submission_time: DateTime<Utc>,
    pub council_message_id: Option<Snowflake>,
    pub public_message_id: Option<Snowflake>,
    pub suggestions_message_id: Option<Snowflake>,
    pub upvotes: i32,
    pub downvotes: i32,
    pub council_approved: Option<bool>,
    pub forced_by: Option<Snowflake>,
    pub forced_reason: Option<String>,
    pub validation_time: Option<DateTime<Utc>>,
    pub revoked: bool,
}

impl Suggestion {
    /// Build a fresh pending suggestion from an insert request
    pub fn from_new(idx: i64, new: &NewSuggestion, submission_time: DateTime<Utc>) -> Self {
        Self {
            idx,
            user_id: new.user_id,
            emoji_id: new.emoji_id,
            emoji_name: new.emoji_name.clone(),
            emoji_animated: new.emoji_animated,
            note: new.note.clone(),
            submission_time,
            council_message_id: Some(new.council_message_id),
            public_message_id: None,
            suggestions_message_id: new.suggestions_message_id,
            upvotes: 0,
            downvotes: 0,
            council_approved: None,
            forced_by: None,
            forced_reason: None,
            validation_time: None,
            revoked: false,
        }
    }

    /// Reject records whose queue message ids contradict their state.
    ///
    /// Pending records live in the council queue only, public records in the
    /// approval queue only, denied records in neither.
    pub fn validate(self) -> Result<Self, DomainError> {
        let corrupt = |reason: &str| DomainError::CorruptRecord {
            idx: self.idx,
            reason: reason.to_string(),
        };

        match self.state() {
            SuggestionState::Pending => {
                if self.council_message_id.is_none() {
                    return Err(corrupt("pending without council message"));
                }
                if self.public_message_id.is_some() {
                    return Err(corrupt("pending with public message"));
                }
            }
            SuggestionState::Public => {
                if self.public_message_id.is_none() {
                    return Err(corrupt("public without public message"));
                }
                if self.council_message_id.is_some() {
                    return Err(corrupt("public still holds council message"));
                }
            }
            SuggestionState::Denied => {
                if self.council_message_id.is_some() || self.public_message_id.is_some() {
                    return Err(corrupt("denied still holds a queue message"));
                }
            }
        }

        Ok(self)
    }

    #[inline]
    pub fn state(&self) -> SuggestionState {
        SuggestionState::from_council_approved(self.council_approved)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.council_approved.is_none()
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.council_approved == Some(true)
    }

    #[inline]
    pub fn is_denied(&self) -> bool {
        self.council_approved == Some(false)
    }

    /// Guard for promote/deny/revoke
    pub fn ensure_pending(&self) -> Result<(), DomainError> {
        if self.is_pending() {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                idx: self.idx,
                state: self.state(),
            })
        }
    }

    /// Check whether a queue message belongs to this suggestion
    pub fn owns_message(&self, message_id: Snowflake) -> bool {
        self.council_message_id == Some(message_id) || self.public_message_id == Some(message_id)
    }

    /// Inline mention of the uploaded emoji
    pub fn emoji_mention(&self) -> String {
        let prefix = if self.emoji_animated { "a" } else { "" };
        format!("<{prefix}:{}:{}>", self.emoji_name, self.emoji_id)
    }

    /// CDN address of the uploaded image
    pub fn emoji_url(&self, cdn_base: &str) -> String {
        let ext = if self.emoji_animated { "gif" } else { "png" };
        format!(
            "{}/emojis/{}.{ext}",
            cdn_base.trim_end_matches('/'),
            self.emoji_id
        )
    }

    /// Human-friendly status block
    pub fn status_text(&self) -> String {
        let validated = self
            .validation_time
            .map(|time| time.format(TIME_FORMAT).to_string());

        let status = match (self.state(), validated) {
            (SuggestionState::Denied, Some(time)) if self.revoked => {
                format!("Revoked by submitter at {time} UTC")
            }
            (SuggestionState::Denied, Some(time)) => format!("Denied at {time} UTC"),
            (SuggestionState::Denied, None) => "Denied".to_string(),
            (SuggestionState::Public, Some(time)) => {
                format!("Moved to public queue at {time} UTC")
            }
            (SuggestionState::Public, None) => "In the public approval queue".to_string(),
            (SuggestionState::Pending, _) => "In the private council queue".to_string(),
        };

        let mut text = format!(
            "**Suggestion #{}**\n\nSubmitted by <@{}> at {} UTC\nUpvotes: **{}** / Downvotes: **{}**\nStatus: {status}\n",
            self.idx,
            self.user_id,
            self.submission_time.format(TIME_FORMAT),
            self.upvotes,
            self.downvotes,
        );

        if let Some(forced_by) = self.forced_by {
            text.push_str(&format!(
                "Forced by: <@{forced_by}>\nReason: {}",
                self.forced_reason.as_deref().unwrap_or("None given")
            ));
        }

        text
    }
}

/// Data needed to insert a new suggestion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSuggestion {
    pub user_id: Snowflake,
    pub council_message_id: Snowflake,
    pub emoji_id: Snowflake,
    pub emoji_name: String,
    pub emoji_animated: bool,
    pub note: Option<String>,
    pub suggestions_message_id: Option<Snowflake>,
}

/// Terminal transition written in a single store transaction.
///
/// Applying it always clears `council_message_id`; an approval also zeroes
/// the vote counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionUpdate {
    pub approved: bool,
    pub public_message_id: Option<Snowflake>,
    pub forced_by: Option<Snowflake>,
    pub forced_reason: Option<String>,
    pub validation_time: DateTime<Utc>,
    pub revoked: bool,
}

impl TransitionUpdate {
    /// Move to the approval queue, where `public_message_id` was just posted
    pub fn promote(
        public_message_id: Snowflake,
        forced_by: Option<Snowflake>,
        forced_reason: Option<String>,
    ) -> Self {
        Self {
            approved: true,
            public_message_id: Some(public_message_id),
            forced_by,
            forced_reason,
            validation_time: Utc::now(),
            revoked: false,
        }
    }

    pub fn deny(
        forced_by: Option<Snowflake>,
        forced_reason: Option<String>,
        revoked: bool,
    ) -> Self {
        Self {
            approved: false,
            public_message_id: None,
            forced_by,
            forced_reason,
            validation_time: Utc::now(),
            revoked,
        }
    }

    /// Apply to an in-memory copy; callers check the state first
    pub fn apply_to(&self, suggestion: &mut Suggestion) {
        suggestion.council_approved = Some(self.approved);
        suggestion.council_message_id = None;
        if self.approved {
            suggestion.upvotes = 0;
            suggestion.downvotes = 0;
        }
        suggestion.public_message_id = self.public_message_id;
        suggestion.forced_by = self.forced_by;
        suggestion.forced_reason.clone_from(&self.forced_reason);
        suggestion.validation_time = Some(self.validation_time);
        suggestion.revoked = self.revoked;
    }
}

//! Vote value objects - markers, deltas and the threshold law

use serde::{Deserialize, Serialize};

/// Which of the two vote markers an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteMarker {
    Approve,
    Deny,
}

impl VoteMarker {
    /// Counter column touched by this marker
    pub const fn counter_column(self) -> &'static str {
        match self {
            Self::Approve => "upvotes",
            Self::Deny => "downvotes",
        }
    }

    /// Stance column touched by this marker
    pub const fn stance_column(self) -> &'static str {
        match self {
            Self::Approve => "has_approved",
            Self::Deny => "has_denied",
        }
    }
}

/// A marker being placed or taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDelta {
    Cast,
    Revoke,
}

impl VoteDelta {
    /// Signed counter change
    #[inline]
    pub const fn amount(self) -> i32 {
        match self {
            Self::Cast => 1,
            Self::Revoke => -1,
        }
    }

    /// Stance value recorded for the reviewer
    #[inline]
    pub const fn stance(self) -> bool {
        matches!(self, Self::Cast)
    }
}

/// Outcome of a threshold evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approve,
    Deny,
}

/// Global vote thresholds.
///
/// A suggestion is decided once enough reviewers took part
/// (`up + down >= required_votes`) and one side leads by at least
/// `required_difference`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteThresholds {
    pub required_votes: i32,
    pub required_difference: i32,
}

impl Default for VoteThresholds {
    fn default() -> Self {
        Self {
            required_votes: 15,
            required_difference: 15,
        }
    }
}

impl VoteThresholds {
    pub const fn new(required_votes: i32, required_difference: i32) -> Self {
        Self {
            required_votes,
            required_difference,
        }
    }

    /// Evaluate the counters once
    pub fn evaluate(&self, upvotes: i32, downvotes: i32) -> Option<Verdict> {
        let upvotes = i64::from(upvotes);
        let downvotes = i64::from(downvotes);

        if upvotes + downvotes < i64::from(self.required_votes) {
            return None;
        }

        let difference = i64::from(self.required_difference);
        if upvotes - downvotes >= difference {
            Some(Verdict::Approve)
        } else if downvotes - upvotes >= difference {
            Some(Verdict::Deny)
        } else {
            None
        }
    }
}

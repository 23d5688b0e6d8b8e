//! Value objects - immutable types that represent domain concepts

mod marker;
mod snowflake;
mod vote;

pub use marker::Marker;
pub use snowflake::{Snowflake, SnowflakeParseError};
pub use vote::{Verdict, VoteDelta, VoteMarker, VoteThresholds};

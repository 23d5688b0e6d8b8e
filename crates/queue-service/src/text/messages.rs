//! Canned replies sent to submitters and alerts sent to operators

use queue_common::ChannelConfig;
use queue_core::{Snowflake, Suggestion};

pub const BAD_SUGGESTION: &str = "Heya! Looks like you tried to suggest an emoji, but your \
message wasn't in the right format, so I wasn't able to understand it. To suggest an emoji, \
post the emoji name like so: `:my_emoji_name:` and upload the image (png, jpg or gif) as an \
attachment. Feel free to try again!";

pub const SUGGESTION_TOO_LARGE: &str = "Hey there! Looks like you tried to submit an emoji, \
but it was too large to accept (it must be under 256kb).\nIf it's static, try making it \
smaller (but at least 128x128).\nIf it's animated, try reducing the length of the animation \
or reducing the framerate.\nOnce you're under the 256kb bar, you can submit again and we'll \
be able to review it for you.";

pub const SUGGESTION_RECEIVED: &str = "Thanks for your emoji submission! It's been added to \
our internal vote queue, so expect an update soon! Your suggestion was left in the channel \
as a public indication, please don't delete it!";

pub const BOT_BROKEN: &str = "Looks like the queue is currently having some technical \
difficulties. The operators have been informed and this problem will be fixed.";

pub const NO_BUFFER_SLOTS: &str =
    "Couldn't process suggestion due to having no free emoji or guild slots!";

/// Reason recorded when a submitter withdraws their own suggestion
pub const REVOKE_REASON: &str = "Revoked by submitter";

/// DM sent when a suggestion reaches the approval queue
pub fn suggestion_approved(channels: &ChannelConfig) -> String {
    format!(
        "Looks like one of your emoji suggestions was passed through our internal queue! \
         Check out <#{}> to see which it was and go vote for your suggestion in <#{}>!",
        channels.council_changelog, channels.approval_queue
    )
}

/// DM sent when a suggestion is denied
pub fn suggestion_denied(channels: &ChannelConfig) -> String {
    format!(
        "Unfortunately, your emoji suggestion was denied after going through internal review. \
         Check out <#{}> to see which it was. Feel free to keep suggesting more emoji, but \
         please don't submit the same one unless you've modified it significantly!",
        channels.council_changelog
    )
}

pub fn resource_not_found(action: &str, suggestion: &Suggestion) -> String {
    format!(
        "\u{26A0} Cannot {action}, the uploaded emoji associated with this suggestion wasn't \
         found. (Suggestion ID: {})",
        suggestion.idx
    )
}

pub fn submitter_not_found(action: &str, suggestion: &Suggestion) -> String {
    format!(
        "\u{26A0} Warning during {action}: the user associated with this suggestion wasn't \
         found. Proceeding anyways. (Suggestion ID: {}, user ID: {})",
        suggestion.idx, suggestion.user_id
    )
}

/// `verb` is "approved" or "denied"
pub fn dm_failed(name_id: &str, verb: &str) -> String {
    format!("\u{26A0} Failed to DM `{name_id}` about their {verb} emoji.")
}

/// `step` is "download" or "upload"
pub fn submission_upload_failed(step: &str, author_id: Snowflake) -> String {
    format!("\u{26A0} Failed to {step} the emoji submitted by <@{author_id}>.")
}

pub fn submission_delete_failed(idx: i64, channel: Snowflake) -> String {
    format!("\u{26A0} Failed to delete suggestion #{idx}'s message in <#{channel}>.")
}

//! Comparison ("VS") workflow
//!
//! Merges several public suggestions (or outside images) into one
//! head-to-head post in the approval queue, voted on with letter markers.

use std::collections::HashSet;

use queue_core::{
    DomainError, ImageSource, Marker, OutgoingMessage, ResourceHandle, Snowflake, Suggestion,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use super::buffer::BufferService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::transition::TransitionService;

/// Fewest options a comparison can have
pub const MIN_OPTIONS: usize = 2;
/// Most options a comparison can have
pub const MAX_OPTIONS: usize = 6;

/// One option of a comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ComparisonRef {
    /// A suggestion in the approval queue
    Suggestion { idx: i64 },
    /// Any image, uploaded under `name`
    Image { url: String, name: String },
}

/// How a comparison ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComparisonOutcome {
    Posted {
        message_id: Snowflake,
        labels: Vec<String>,
    },
    /// Declined or timed out
    Cancelled,
}

struct ResolvedOption {
    label: String,
    name: String,
    source: ImageSource,
    animated: bool,
    suggestion: Option<Suggestion>,
}

/// Check option count and duplicates before anything else happens
pub fn validate_refs(refs: &[ComparisonRef]) -> Result<(), DomainError> {
    if !(MIN_OPTIONS..=MAX_OPTIONS).contains(&refs.len()) {
        return Err(DomainError::InvalidComparison(format!(
            "between {MIN_OPTIONS} and {MAX_OPTIONS} options are required, got {}",
            refs.len()
        )));
    }

    let mut seen = HashSet::new();
    for reference in refs {
        let key = match reference {
            ComparisonRef::Suggestion { idx } => format!("#{idx}"),
            ComparisonRef::Image { url, name } => {
                if !is_valid_emoji_name(name) {
                    return Err(DomainError::InvalidReference(format!(
                        "`{name}` is not a valid emoji name"
                    )));
                }
                url.clone()
            }
        };
        if !seen.insert(key.clone()) {
            return Err(DomainError::InvalidComparison(format!(
                "{key} is listed more than once"
            )));
        }
    }

    Ok(())
}

fn is_valid_emoji_name(name: &str) -> bool {
    (2..=32).contains(&name.chars().count())
        && name.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Comparison service
pub struct ComparisonService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ComparisonService<'a> {
    /// Create a new ComparisonService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run a comparison requested by `actor` in `channel_id`.
    ///
    /// Only one comparison runs at a time; a concurrent request fails with
    /// `ComparisonInProgress`. The lock is kept for the configured cooldown
    /// after the workflow ends.
    #[instrument(skip(self, refs), fields(options = refs.len()))]
    pub async fn run(
        &self,
        actor: Snowflake,
        channel_id: Snowflake,
        refs: &[ComparisonRef],
    ) -> ServiceResult<ComparisonOutcome> {
        validate_refs(refs)?;

        let _lock = self.ctx.guard().try_lock_comparison()?;
        let outcome = self.compare(actor, channel_id, refs).await;
        tokio::time::sleep(self.ctx.settings().comparison.cooldown).await;
        outcome
    }

    async fn compare(
        &self,
        actor: Snowflake,
        channel_id: Snowflake,
        refs: &[ComparisonRef],
    ) -> ServiceResult<ComparisonOutcome> {
        let options = self.resolve(refs).await?;

        let mut temporary = Vec::with_capacity(options.len());
        if let Err(e) = self.materialize(&options, &mut temporary).await {
            self.cleanup(&temporary).await;
            return Err(e);
        }

        let outcome = self
            .confirm_and_post(actor, channel_id, &options, &temporary)
            .await;
        self.cleanup(&temporary).await;

        let message_id = match outcome? {
            Some(message_id) => message_id,
            None => {
                info!("Comparison cancelled");
                return Ok(ComparisonOutcome::Cancelled);
            }
        };

        self.retire_merged(&options).await;

        let labels: Vec<String> = options.into_iter().map(|o| o.label).collect();
        info!(message_id = %message_id, options = ?labels, "Comparison posted");
        Ok(ComparisonOutcome::Posted { message_id, labels })
    }

    /// Look every reference up; suggestions must be in the approval queue
    async fn resolve(&self, refs: &[ComparisonRef]) -> ServiceResult<Vec<ResolvedOption>> {
        let cdn_base = &self.ctx.settings().cdn_base;
        let mut options = Vec::with_capacity(refs.len());

        for reference in refs {
            let option = match reference {
                ComparisonRef::Suggestion { idx } => {
                    let suggestion = self
                        .ctx
                        .suggestion_repo()
                        .find_by_idx(*idx)
                        .await?
                        .ok_or(DomainError::SuggestionNotFound(*idx))?;
                    if !suggestion.is_public() {
                        return Err(DomainError::NotPublic(*idx).into());
                    }
                    ResolvedOption {
                        label: format!("#{idx}"),
                        name: suggestion.emoji_name.clone(),
                        source: ImageSource::Url {
                            url: suggestion.emoji_url(cdn_base),
                        },
                        animated: suggestion.emoji_animated,
                        suggestion: Some(suggestion),
                    }
                }
                ComparisonRef::Image { url, name } => ResolvedOption {
                    label: name.clone(),
                    name: name.clone(),
                    source: ImageSource::Url { url: url.clone() },
                    animated: url
                        .split(['?', '#'])
                        .next()
                        .is_some_and(|path| path.to_ascii_lowercase().ends_with(".gif")),
                    suggestion: None,
                },
            };
            options.push(option);
        }

        Ok(options)
    }

    /// Upload each option as a temporary emoji, pushing handles as they land
    async fn materialize(
        &self,
        options: &[ResolvedOption],
        temporary: &mut Vec<ResourceHandle>,
    ) -> ServiceResult<()> {
        let transport = self.ctx.transport();
        let buffers = BufferService::new(self.ctx);

        for option in options {
            let image = transport.fetch_image(&option.source).await?;
            let container = buffers.acquire().await?;
            let handle = transport
                .create_resource(container.id, &option.name, &image, option.animated)
                .await?;
            temporary.push(handle);
        }

        Ok(())
    }

    /// Returns the posted message id, or `None` when not confirmed in time
    async fn confirm_and_post(
        &self,
        actor: Snowflake,
        channel_id: Snowflake,
        options: &[ResolvedOption],
        temporary: &[ResourceHandle],
    ) -> ServiceResult<Option<Snowflake>> {
        let settings = self.ctx.settings();
        let transport = self.ctx.transport();

        let listing = option_lines(options, temporary);
        let prompt = format!("Post this comparison to <#{}>?\n\n{listing}", settings.channels.approval_queue);

        let confirmed = transport
            .request_confirmation(
                channel_id,
                actor,
                &prompt,
                settings.comparison.confirm_timeout,
            )
            .await?;
        if !confirmed {
            info!("Comparison not confirmed");
            return Ok(None);
        }

        let message_id = transport
            .deliver(
                settings.channels.approval_queue,
                &OutgoingMessage::text(format!("**Which one should it be?**\n\n{listing}")),
            )
            .await?;

        for index in 0..options.len() {
            let Some(marker) = Marker::option_letter(index) else {
                break;
            };
            if let Err(e) = transport
                .add_marker(settings.channels.approval_queue, message_id, &marker)
                .await
            {
                warn!(error = %e, option = index, "Failed to add option marker");
            }
        }

        Ok(Some(message_id))
    }

    /// Take merged suggestions out of the approval queue and log their tallies
    async fn retire_merged(&self, options: &[ResolvedOption]) {
        let transitions = TransitionService::new(self.ctx);
        let changelog = self.ctx.settings().channels.council_changelog;

        for suggestion in options.iter().filter_map(|o| o.suggestion.as_ref()) {
            if let Err(e) = transitions.remove_from_public_queue(suggestion).await {
                warn!(error = %e, idx = suggestion.idx, "Failed to remove merged suggestion from the approval queue");
            }

            let tally = OutgoingMessage::text(format!(
                "#{} \u{25B2} {} / \u{25BC} {}",
                suggestion.idx, suggestion.upvotes, suggestion.downvotes
            ));
            if let Err(e) = self.ctx.transport().deliver(changelog, &tally).await {
                warn!(error = %e, idx = suggestion.idx, "Failed to post final tally");
            }
        }
    }

    async fn cleanup(&self, temporary: &[ResourceHandle]) {
        for handle in temporary {
            if let Err(e) = self.ctx.transport().delete_resource(handle).await {
                warn!(error = %e, resource_id = %handle.id, "Failed to delete temporary emoji");
            }
        }
    }
}

fn option_lines(options: &[ResolvedOption], temporary: &[ResourceHandle]) -> String {
    options
        .iter()
        .zip(temporary)
        .enumerate()
        .map(|(index, (option, handle))| {
            let letter = Marker::option_letter(index).map(|m| m.to_string()).unwrap_or_default();
            format!("{letter} {handle} {}", option.label)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

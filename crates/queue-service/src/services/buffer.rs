//! Buffer pool manager
//!
//! Emoji are staged in guilds owned by the bot. A guild holds at most
//! [`CONTAINER_SLOT_LIMIT`] emoji and the bot may own at most
//! [`MAX_OWNED_CONTAINERS`] guilds.

use queue_core::{BufferContainer, DomainError, CONTAINER_SLOT_LIMIT, MAX_OWNED_CONTAINERS};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Name given to containers created on demand
pub const CONTAINER_NAME: &str = "Emoji Queue Buffer";

/// Buffer service
pub struct BufferService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> BufferService<'a> {
    /// Create a new BufferService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Find a container with a free slot, creating one if needed.
    ///
    /// The slot check is read-then-act against the platform; a concurrent
    /// upload can still fill the container before ours lands.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> ServiceResult<BufferContainer> {
        let transport = self.ctx.transport();
        let owned = transport.list_self_owned_containers().await?;

        if let Some(container) = owned.iter().find(|c| c.has_free_slot()) {
            return Ok(container.clone());
        }

        if owned.len() >= MAX_OWNED_CONTAINERS {
            return Err(DomainError::ResourceExhausted(format!(
                "all {} owned containers hold {CONTAINER_SLOT_LIMIT} emoji",
                owned.len()
            ))
            .into());
        }

        let id = transport.create_container(CONTAINER_NAME).await?;
        info!(container_id = %id, owned = owned.len() + 1, "Created buffer container");

        Ok(BufferContainer {
            id,
            name: CONTAINER_NAME.to_string(),
            slots_used: 0,
        })
    }
}

//! Messaging transport port - every platform side effect goes through here

use std::time::Duration;

use async_trait::async_trait;

use super::RepoResult;
use crate::entities::{BufferContainer, ImageSource, OutgoingMessage, ResourceHandle, UserHandle};
use crate::value_objects::{Marker, Snowflake};

#[async_trait]
pub trait MessagingTransport: Send + Sync {
    /// Post a message, returning its id
    async fn deliver(&self, channel_id: Snowflake, message: &OutgoingMessage)
        -> RepoResult<Snowflake>;

    /// React to a message
    async fn add_marker(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        marker: &Marker,
    ) -> RepoResult<()>;

    /// Delete a message; an absent message yields `MessageNotFound`
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> RepoResult<()>;

    /// Look up an uploaded emoji
    async fn find_resource(&self, resource_id: Snowflake) -> RepoResult<Option<ResourceHandle>>;

    /// Upload an emoji into a buffer container
    async fn create_resource(
        &self,
        container_id: Snowflake,
        name: &str,
        image: &[u8],
        animated: bool,
    ) -> RepoResult<ResourceHandle>;

    /// Delete an uploaded emoji
    async fn delete_resource(&self, resource: &ResourceHandle) -> RepoResult<()>;

    /// Download image bytes
    async fn fetch_image(&self, source: &ImageSource) -> RepoResult<Vec<u8>>;

    /// Look up a user
    async fn find_user(&self, user_id: Snowflake) -> RepoResult<Option<UserHandle>>;

    /// Send a direct message
    async fn send_direct(&self, user_id: Snowflake, content: &str) -> RepoResult<()>;

    /// Buffer containers owned by the bot
    async fn list_self_owned_containers(&self) -> RepoResult<Vec<BufferContainer>>;

    /// Create a new buffer container, returning its id
    async fn create_container(&self, name: &str) -> RepoResult<Snowflake>;

    /// Ask `actor_id` to confirm a prompt posted in `channel_id`.
    ///
    /// Resolves `false` on decline or once `timeout` passes unanswered.
    /// The prompt is gone from the channel when this returns.
    async fn request_confirmation(
        &self,
        channel_id: Snowflake,
        actor_id: Snowflake,
        prompt: &str,
        timeout: Duration,
    ) -> RepoResult<bool>;
}

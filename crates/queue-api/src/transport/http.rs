//! reqwest adapter for a Discord-compatible REST API (v10)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use dashmap::DashMap;
use queue_common::PlatformConfig;
use queue_core::{
    BufferContainer, DomainError, ImageSource, Marker, MessagingTransport, OutgoingMessage,
    RepoResult, ResourceHandle, Snowflake, UserHandle,
};
use reqwest::{header, multipart, Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, instrument, warn};

use super::confirmations::{ConfirmationRegistry, CONFIRM_MARKER, DECLINE_MARKER};

const USER_AGENT: &str = concat!("emoji-queue/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct MessageObject {
    id: Snowflake,
}

#[derive(Debug, Deserialize)]
struct ChannelObject {
    id: Snowflake,
}

#[derive(Debug, Deserialize)]
struct UserObject {
    id: Snowflake,
    username: String,
}

#[derive(Debug, Deserialize)]
struct GuildObject {
    id: Snowflake,
    name: String,
    #[serde(default)]
    owner: bool,
}

#[derive(Debug, Deserialize)]
struct EmojiObject {
    id: Snowflake,
    name: String,
    #[serde(default)]
    animated: bool,
}

#[derive(Debug, Serialize)]
struct CreateMessageRequest<'a> {
    content: &'a str,
    allowed_mentions: serde_json::Value,
}

impl<'a> CreateMessageRequest<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            // Users only; never @everyone or roles
            allowed_mentions: json!({ "parse": ["users"] }),
        }
    }
}

/// Guess the image type from its leading bytes
pub fn sniff_image_mime(image: &[u8]) -> Option<&'static str> {
    if image.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if image.starts_with(b"GIF87a") || image.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if image.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else {
        None
    }
}

/// `data:` URI the emoji upload endpoint expects
pub fn image_data_uri(image: &[u8], animated: bool) -> String {
    let mime = sniff_image_mime(image).unwrap_or(if animated { "image/gif" } else { "image/png" });
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(image))
}

fn transport_error(err: reqwest::Error) -> DomainError {
    DomainError::TransportError(err.to_string())
}

/// Messaging transport over the platform REST API
pub struct HttpTransport {
    client: Client,
    api_base: Url,
    cdn_base: String,
    token: String,
    confirmations: Arc<ConfirmationRegistry>,
    /// Emoji id to the container it was uploaded to
    resource_index: DashMap<Snowflake, Snowflake>,
}

impl HttpTransport {
    pub fn new(
        config: &PlatformConfig,
        confirmations: Arc<ConfirmationRegistry>,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let api_base = Url::parse(&config.api_base)?;
        if api_base.cannot_be_a_base() {
            anyhow::bail!("{} cannot be used as an API base", config.api_base);
        }

        Ok(Self {
            client,
            api_base,
            cdn_base: config.cdn_base.trim_end_matches('/').to_string(),
            token: config.bot_token.clone(),
            confirmations,
            resource_index: DashMap::new(),
        })
    }

    fn endpoint<I>(&self, segments: I) -> Url
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Send and turn any non-2xx status into a transport error
    async fn send(&self, request: RequestBuilder) -> RepoResult<Response> {
        let response = request.send().await.map_err(transport_error)?;
        ensure_success(response).await
    }

    async fn send_json<T: for<'de> Deserialize<'de>>(&self, request: RequestBuilder) -> RepoResult<T> {
        self.send(request)
            .await?
            .json::<T>()
            .await
            .map_err(transport_error)
    }

    async fn owned_guilds(&self) -> RepoResult<Vec<GuildObject>> {
        let guilds: Vec<GuildObject> = self
            .send_json(self.request(Method::GET, self.endpoint(["users", "@me", "guilds"])))
            .await?;
        Ok(guilds.into_iter().filter(|g| g.owner).collect())
    }

    async fn guild_emojis(&self, guild_id: Snowflake) -> RepoResult<Vec<EmojiObject>> {
        self.send_json(self.request(
            Method::GET,
            self.endpoint(["guilds", &guild_id.to_string(), "emojis"]),
        ))
        .await
    }

    /// Look an emoji up in one container; `None` when it is not there
    async fn guild_emoji(
        &self,
        guild_id: Snowflake,
        emoji_id: Snowflake,
    ) -> RepoResult<Option<EmojiObject>> {
        let url = self.endpoint([
            "guilds",
            &guild_id.to_string(),
            "emojis",
            &emoji_id.to_string(),
        ]);
        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        ensure_success(response)
            .await?
            .json()
            .await
            .map(Some)
            .map_err(transport_error)
    }
}

async fn ensure_success(response: Response) -> RepoResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = response.url().path().to_string();
    let body = response.text().await.unwrap_or_default();
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!(path = %url, "Rate limited by the platform");
    }
    Err(DomainError::TransportError(format!("{status} from {url}: {body}")))
}

fn to_handle(emoji: EmojiObject, container_id: Snowflake) -> ResourceHandle {
    ResourceHandle {
        id: emoji.id,
        container_id,
        name: emoji.name,
        animated: emoji.animated,
    }
}

#[async_trait]
impl MessagingTransport for HttpTransport {
    #[instrument(skip(self, message), fields(has_file = message.file.is_some()))]
    async fn deliver(
        &self,
        channel_id: Snowflake,
        message: &OutgoingMessage,
    ) -> RepoResult<Snowflake> {
        let url = self.endpoint(["channels", &channel_id.to_string(), "messages"]);
        let payload = CreateMessageRequest::new(&message.content);

        let request = match &message.file {
            None => self.request(Method::POST, url).json(&payload),
            Some(file) => {
                let payload_json = serde_json::to_string(&payload)
                    .map_err(|e| DomainError::TransportError(e.to_string()))?;
                let form = multipart::Form::new()
                    .text("payload_json", payload_json)
                    .part(
                        "files[0]",
                        multipart::Part::bytes(file.data.clone()).file_name(file.filename.clone()),
                    );
                self.request(Method::POST, url).multipart(form)
            }
        };

        let message: MessageObject = self.send_json(request).await?;
        debug!(message_id = %message.id, "Message delivered");
        Ok(message.id)
    }

    async fn add_marker(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
        marker: &Marker,
    ) -> RepoResult<()> {
        let url = self.endpoint([
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
            "reactions",
            &marker.api_value(),
            "@me",
        ]);
        self.send(self.request(Method::PUT, url)).await?;
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<()> {
        let url = self.endpoint([
            "channels",
            &channel_id.to_string(),
            "messages",
            &message_id.to_string(),
        ]);
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(DomainError::MessageNotFound(message_id));
        }
        ensure_success(response).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_resource(&self, resource_id: Snowflake) -> RepoResult<Option<ResourceHandle>> {
        if let Some(container_id) = self.resource_index.get(&resource_id).map(|e| *e.value()) {
            if let Some(emoji) = self.guild_emoji(container_id, resource_id).await? {
                return Ok(Some(to_handle(emoji, container_id)));
            }
            self.resource_index.remove(&resource_id);
        }

        // Unknown to this process (e.g. uploaded before a restart): scan
        for guild in self.owned_guilds().await? {
            let found = self
                .guild_emojis(guild.id)
                .await?
                .into_iter()
                .find(|emoji| emoji.id == resource_id);
            if let Some(emoji) = found {
                self.resource_index.insert(resource_id, guild.id);
                return Ok(Some(to_handle(emoji, guild.id)));
            }
        }

        Ok(None)
    }

    #[instrument(skip(self, image), fields(bytes = image.len()))]
    async fn create_resource(
        &self,
        container_id: Snowflake,
        name: &str,
        image: &[u8],
        animated: bool,
    ) -> RepoResult<ResourceHandle> {
        let url = self.endpoint(["guilds", &container_id.to_string(), "emojis"]);
        let body = json!({
            "name": name,
            "image": image_data_uri(image, animated),
            "roles": [],
        });

        let emoji: EmojiObject = self
            .send_json(self.request(Method::POST, url).json(&body))
            .await?;
        self.resource_index.insert(emoji.id, container_id);
        debug!(emoji_id = %emoji.id, "Emoji uploaded");
        Ok(to_handle(emoji, container_id))
    }

    async fn delete_resource(&self, resource: &ResourceHandle) -> RepoResult<()> {
        let url = self.endpoint([
            "guilds",
            &resource.container_id.to_string(),
            "emojis",
            &resource.id.to_string(),
        ]);
        let response = self
            .request(Method::DELETE, url)
            .send()
            .await
            .map_err(transport_error)?;
        self.resource_index.remove(&resource.id);
        if response.status() == StatusCode::NOT_FOUND {
            debug!(emoji_id = %resource.id, "Emoji already gone");
            return Ok(());
        }
        ensure_success(response).await?;
        Ok(())
    }

    async fn fetch_image(&self, source: &ImageSource) -> RepoResult<Vec<u8>> {
        let url = match source {
            ImageSource::Resource { id, animated } => {
                let ext = if *animated { "gif" } else { "png" };
                format!("{}/emojis/{id}.{ext}", self.cdn_base)
            }
            ImageSource::Url { url } => url.clone(),
        };

        // No bot token outside the API
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;
        let bytes = ensure_success(response)
            .await?
            .bytes()
            .await
            .map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn find_user(&self, user_id: Snowflake) -> RepoResult<Option<UserHandle>> {
        let response = self
            .request(Method::GET, self.endpoint(["users", &user_id.to_string()]))
            .send()
            .await
            .map_err(transport_error)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let user: UserObject = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(transport_error)?;
        Ok(Some(UserHandle {
            id: user.id,
            name: user.username,
        }))
    }

    async fn send_direct(&self, user_id: Snowflake, content: &str) -> RepoResult<()> {
        let channel: ChannelObject = self
            .send_json(
                self.request(Method::POST, self.endpoint(["users", "@me", "channels"]))
                    .json(&json!({ "recipient_id": user_id })),
            )
            .await?;
        self.deliver(channel.id, &OutgoingMessage::text(content))
            .await?;
        Ok(())
    }

    async fn list_self_owned_containers(&self) -> RepoResult<Vec<BufferContainer>> {
        let mut containers = Vec::new();
        for guild in self.owned_guilds().await? {
            let slots_used = self.guild_emojis(guild.id).await?.len();
            containers.push(BufferContainer {
                id: guild.id,
                name: guild.name,
                slots_used,
            });
        }
        Ok(containers)
    }

    async fn create_container(&self, name: &str) -> RepoResult<Snowflake> {
        let guild: GuildObject = self
            .send_json(
                self.request(Method::POST, self.endpoint(["guilds"]))
                    .json(&json!({ "name": name })),
            )
            .await?;
        Ok(guild.id)
    }

    #[instrument(skip(self, prompt))]
    async fn request_confirmation(
        &self,
        channel_id: Snowflake,
        actor_id: Snowflake,
        prompt: &str,
        timeout: Duration,
    ) -> RepoResult<bool> {
        let message_id = self
            .deliver(channel_id, &OutgoingMessage::text(prompt))
            .await?;
        let pending = self.confirmations.register(message_id, actor_id);

        let answer = async {
            for marker in [CONFIRM_MARKER, DECLINE_MARKER] {
                self.add_marker(channel_id, message_id, &Marker::unicode(marker))
                    .await?;
            }
            Ok::<_, DomainError>(tokio::time::timeout(timeout, pending.wait()).await)
        }
        .await;

        if let Err(e) = self.delete_message(channel_id, message_id).await {
            debug!(error = %e, "Could not remove confirmation prompt");
        }

        match answer? {
            Ok(confirmed) => Ok(confirmed),
            Err(_) => {
                info!(message_id = %message_id, "Confirmation timed out");
                Ok(false)
            }
        }
    }
}

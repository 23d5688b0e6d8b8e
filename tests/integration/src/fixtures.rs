//! Test fixtures
//!
//! [`RecordingTransport`] stands in for the messaging platform: it keeps
//! every side effect so tests can assert on it, and individual calls can be
//! made to fail. [`Harness`] wires it to the in-memory store.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use queue_common::{ChannelConfig, ComparisonConfig, MarkerConfig, QueueSettings};
use queue_core::{
    Attachment, BufferContainer, DomainError, ImageSource, Marker, MarkerEvent, MarkerKind,
    MessagingTransport, OutgoingMessage, RepoResult, ResourceHandle, Snowflake,
    SubmissionPosted, Suggestion, SuggestionRepository, UserHandle, VoteMarker, VoteThresholds,
    CONTAINER_SLOT_LIMIT,
};
use queue_db::InMemoryStore;
use queue_service::{
    PromoteOutcome, ServiceContext, ServiceContextBuilder, SubmissionOutcome, SubmissionService,
    TransitionService, VoteOutcome, VotingService,
};

pub const BOT_ID: i64 = 1000;

pub const SUGGESTIONS: i64 = 1;
pub const COUNCIL_QUEUE: i64 = 2;
pub const APPROVAL_QUEUE: i64 = 3;
pub const SUGGESTIONS_LOG: i64 = 4;
pub const COUNCIL_CHANGELOG: i64 = 5;
pub const BOT_LOG: i64 = 6;

pub const APPROVE_EMOJI: i64 = 9001;
pub const DENY_EMOJI: i64 = 9002;

/// Bytes served for every image download
pub const FAKE_PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

pub fn sf(id: i64) -> Snowflake {
    Snowflake::new(id)
}

/// Queue settings pointing at the fixed test channels.
///
/// Comparisons time out quickly and have no cooldown.
pub fn test_settings() -> QueueSettings {
    QueueSettings {
        bot_user_id: sf(BOT_ID),
        cdn_base: "https://cdn.test".to_string(),
        channels: ChannelConfig {
            suggestions: sf(SUGGESTIONS),
            council_queue: sf(COUNCIL_QUEUE),
            approval_queue: sf(APPROVAL_QUEUE),
            suggestions_log: sf(SUGGESTIONS_LOG),
            council_changelog: sf(COUNCIL_CHANGELOG),
            bot_log: sf(BOT_LOG),
        },
        markers: MarkerConfig {
            approve: Marker::custom(sf(APPROVE_EMOJI), "blobupvote"),
            deny: Marker::custom(sf(DENY_EMOJI), "blobdownvote"),
        },
        voting: VoteThresholds::default(),
        comparison: ComparisonConfig {
            confirm_timeout: Duration::from_millis(200),
            cooldown: Duration::ZERO,
        },
    }
}

/// Calls that can be made to fail
#[derive(Debug, Clone, Default)]
pub struct Failures {
    pub deliver_to: HashSet<Snowflake>,
    pub direct_messages: bool,
    pub delete_messages: bool,
    pub create_resource: bool,
    pub fetch_image: bool,
}

/// A message the transport delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub channel_id: Snowflake,
    pub message_id: Snowflake,
    pub message: OutgoingMessage,
}

struct Container {
    id: Snowflake,
    name: String,
    /// Slots taken by emoji this fake never saw uploaded
    prefilled: usize,
}

struct State {
    next_id: i64,
    delivered: Vec<Delivered>,
    live: HashSet<(Snowflake, Snowflake)>,
    deleted: Vec<(Snowflake, Snowflake)>,
    markers: Vec<(Snowflake, Marker)>,
    containers: Vec<Container>,
    containers_created: usize,
    resources: HashMap<Snowflake, ResourceHandle>,
    users: HashMap<Snowflake, UserHandle>,
    direct: Vec<(Snowflake, String)>,
    prompts: Vec<String>,
    /// `None` never answers
    confirmation: Option<bool>,
    failures: Failures,
    /// Applied to every channel delivery
    delivery_delay: Duration,
}

/// In-process fake of the messaging platform
pub struct RecordingTransport {
    state: Mutex<State>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 50_000,
                delivered: Vec::new(),
                live: HashSet::new(),
                deleted: Vec::new(),
                markers: Vec::new(),
                containers: Vec::new(),
                containers_created: 0,
                resources: HashMap::new(),
                users: HashMap::new(),
                direct: Vec::new(),
                prompts: Vec::new(),
                confirmation: Some(true),
                failures: Failures::default(),
                delivery_delay: Duration::ZERO,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // === Setup ===

    pub fn add_user(&self, id: Snowflake, name: &str) {
        self.state().users.insert(
            id,
            UserHandle {
                id,
                name: name.to_string(),
            },
        );
    }

    /// Add an owned container that already holds `slots_used` emoji
    pub fn add_container(&self, name: &str, slots_used: usize) -> Snowflake {
        let mut state = self.state();
        let id = next_id(&mut state);
        state.containers.push(Container {
            id,
            name: name.to_string(),
            prefilled: slots_used,
        });
        id
    }

    pub fn set_confirmation(&self, answer: Option<bool>) {
        self.state().confirmation = answer;
    }

    pub fn set_delivery_delay(&self, delay: Duration) {
        self.state().delivery_delay = delay;
    }

    pub fn configure_failures(&self, configure: impl FnOnce(&mut Failures)) {
        configure(&mut self.state().failures);
    }

    /// Make an uploaded emoji disappear behind the queue's back
    pub fn drop_resource(&self, id: Snowflake) {
        self.state().resources.remove(&id);
    }

    // === Inspection ===

    pub fn delivered(&self) -> Vec<Delivered> {
        self.state().delivered.clone()
    }

    pub fn delivered_to(&self, channel_id: i64) -> Vec<Delivered> {
        self.state()
            .delivered
            .iter()
            .filter(|d| d.channel_id == sf(channel_id))
            .cloned()
            .collect()
    }

    pub fn markers_on(&self, message_id: Snowflake) -> Vec<Marker> {
        self.state()
            .markers
            .iter()
            .filter(|(id, _)| *id == message_id)
            .map(|(_, marker)| marker.clone())
            .collect()
    }

    pub fn is_live(&self, channel_id: i64, message_id: Snowflake) -> bool {
        self.state().live.contains(&(sf(channel_id), message_id))
    }

    pub fn was_deleted(&self, channel_id: i64, message_id: Snowflake) -> bool {
        self.state().deleted.contains(&(sf(channel_id), message_id))
    }

    pub fn has_resource(&self, id: Snowflake) -> bool {
        self.state().resources.contains_key(&id)
    }

    pub fn resource_count(&self) -> usize {
        self.state().resources.len()
    }

    pub fn direct_messages_to(&self, user_id: Snowflake) -> Vec<String> {
        self.state()
            .direct
            .iter()
            .filter(|(id, _)| *id == user_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.state().prompts.clone()
    }

    pub fn containers_created(&self) -> usize {
        self.state().containers_created
    }
}

fn next_id(state: &mut State) -> Snowflake {
    state.next_id += 1;
    sf(state.next_id)
}

fn slots_used(state: &State, container: &Container) -> usize {
    container.prefilled
        + state
            .resources
            .values()
            .filter(|r| r.container_id == container.id)
            .count()
}

fn injected(what: &str) -> DomainError {
    DomainError::TransportError(format!("injected {what} failure"))
}

#[async_trait]
impl MessagingTransport for RecordingTransport {
    async fn deliver(
        &self,
        channel_id: Snowflake,
        message: &OutgoingMessage,
    ) -> RepoResult<Snowflake> {
        let delay = self.state().delivery_delay;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if state.failures.deliver_to.contains(&channel_id) {
            return Err(injected("deliver"));
        }
        let message_id = next_id(&mut state);
        state.live.insert((channel_id, message_id));
        state.delivered.push(Delivered {
            channel_id,
            message_id,
            message: message.clone(),
        });
        Ok(message_id)
    }

    async fn add_marker(
        &self,
        _channel_id: Snowflake,
        message_id: Snowflake,
        marker: &Marker,
    ) -> RepoResult<()> {
        self.state().markers.push((message_id, marker.clone()));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> RepoResult<()> {
        let mut state = self.state();
        if state.failures.delete_messages {
            return Err(injected("delete"));
        }
        if !state.live.remove(&(channel_id, message_id)) {
            return Err(DomainError::MessageNotFound(message_id));
        }
        state.deleted.push((channel_id, message_id));
        Ok(())
    }

    async fn find_resource(&self, resource_id: Snowflake) -> RepoResult<Option<ResourceHandle>> {
        Ok(self.state().resources.get(&resource_id).cloned())
    }

    async fn create_resource(
        &self,
        container_id: Snowflake,
        name: &str,
        _image: &[u8],
        animated: bool,
    ) -> RepoResult<ResourceHandle> {
        let mut state = self.state();
        if state.failures.create_resource {
            return Err(injected("upload"));
        }
        let Some(container) = state.containers.iter().find(|c| c.id == container_id) else {
            return Err(DomainError::TransportError(format!(
                "unknown container {container_id}"
            )));
        };
        if slots_used(&state, container) >= CONTAINER_SLOT_LIMIT {
            return Err(DomainError::ResourceExhausted(format!(
                "container {container_id} is full"
            )));
        }

        let handle = ResourceHandle {
            id: next_id(&mut state),
            container_id,
            name: name.to_string(),
            animated,
        };
        state.resources.insert(handle.id, handle.clone());
        Ok(handle)
    }

    async fn delete_resource(&self, resource: &ResourceHandle) -> RepoResult<()> {
        self.state().resources.remove(&resource.id);
        Ok(())
    }

    async fn fetch_image(&self, _source: &ImageSource) -> RepoResult<Vec<u8>> {
        if self.state().failures.fetch_image {
            return Err(injected("download"));
        }
        Ok(FAKE_PNG.to_vec())
    }

    async fn find_user(&self, user_id: Snowflake) -> RepoResult<Option<UserHandle>> {
        Ok(self.state().users.get(&user_id).cloned())
    }

    async fn send_direct(&self, user_id: Snowflake, content: &str) -> RepoResult<()> {
        let mut state = self.state();
        if state.failures.direct_messages {
            return Err(injected("direct message"));
        }
        state.direct.push((user_id, content.to_string()));
        Ok(())
    }

    async fn list_self_owned_containers(&self) -> RepoResult<Vec<BufferContainer>> {
        let state = self.state();
        Ok(state
            .containers
            .iter()
            .map(|c| BufferContainer {
                id: c.id,
                name: c.name.clone(),
                slots_used: slots_used(&state, c),
            })
            .collect())
    }

    async fn create_container(&self, name: &str) -> RepoResult<Snowflake> {
        let mut state = self.state();
        let id = next_id(&mut state);
        state.containers.push(Container {
            id,
            name: name.to_string(),
            prefilled: 0,
        });
        state.containers_created += 1;
        Ok(id)
    }

    async fn request_confirmation(
        &self,
        _channel_id: Snowflake,
        _actor_id: Snowflake,
        prompt: &str,
        timeout: Duration,
    ) -> RepoResult<bool> {
        let answer = {
            let mut state = self.state();
            state.prompts.push(prompt.to_string());
            state.confirmation
        };
        match answer {
            Some(answer) => Ok(answer),
            None => {
                tokio::time::sleep(timeout).await;
                Ok(false)
            }
        }
    }
}

/// Store, fake platform and service context wired together
pub struct Harness {
    pub store: Arc<InMemoryStore>,
    pub transport: Arc<RecordingTransport>,
    pub ctx: ServiceContext,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: QueueSettings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let transport = Arc::new(RecordingTransport::new());
        let ctx = ServiceContextBuilder::new()
            .suggestion_repo(store.clone())
            .vote_repo(store.clone())
            .transport(transport.clone())
            .settings(settings)
            .build()
            .expect("every dependency is provided");

        Self {
            store,
            transport,
            ctx,
        }
    }

    /// A live message in the suggestions channel carrying one attachment
    pub fn submission(&self, user_id: i64, content: &str, filename: &str, size: u64) -> SubmissionPosted {
        let message_id = sf(user_id * 100 + 7);
        self.transport
            .state()
            .live
            .insert((sf(SUGGESTIONS), message_id));

        SubmissionPosted {
            message_id,
            channel_id: sf(SUGGESTIONS),
            author_id: sf(user_id),
            author_name: format!("user{user_id}"),
            content: content.to_string(),
            attachments: vec![Attachment {
                id: sf(user_id * 100 + 8),
                filename: filename.to_string(),
                url: format!("https://media.test/{filename}"),
                size,
            }],
        }
    }

    pub async fn submit(&self, event: &SubmissionPosted) -> SubmissionOutcome {
        SubmissionService::new(&self.ctx)
            .handle(event)
            .await
            .expect("submission handled")
    }

    /// Submit `:name:` as `user_id` and return the stored suggestion
    pub async fn pending(&self, user_id: i64, name: &str) -> Suggestion {
        self.transport.add_user(sf(user_id), &format!("user{user_id}"));
        let event = self.submission(user_id, &format!(":{name}:"), &format!("{name}.png"), 1024);
        match self.submit(&event).await {
            SubmissionOutcome::Accepted(idx) => self.reload(idx).await,
            other => panic!("submission not accepted: {other:?}"),
        }
    }

    /// A suggestion already moved to the approval queue
    pub async fn public(&self, user_id: i64, name: &str) -> Suggestion {
        let pending = self.pending(user_id, name).await;
        match TransitionService::new(&self.ctx)
            .promote(&pending, None, None)
            .await
            .expect("promotion succeeds")
        {
            PromoteOutcome::Promoted(suggestion) => suggestion,
            PromoteOutcome::ResourceMissing => panic!("uploaded emoji missing"),
        }
    }

    pub async fn reload(&self, idx: i64) -> Suggestion {
        self.store
            .find_by_idx(idx)
            .await
            .expect("store readable")
            .expect("suggestion exists")
    }

    /// A vote marker event on the suggestion's current queue post
    pub fn vote_event(
        &self,
        suggestion: &Suggestion,
        user_id: i64,
        vote: VoteMarker,
        kind: MarkerKind,
    ) -> MarkerEvent {
        let (channel_id, message_id) = match suggestion.public_message_id {
            Some(id) => (sf(APPROVAL_QUEUE), id),
            None => (
                sf(COUNCIL_QUEUE),
                suggestion.council_message_id.expect("council post recorded"),
            ),
        };
        let markers = &self.ctx.settings().markers;
        let marker = match vote {
            VoteMarker::Approve => markers.approve.clone(),
            VoteMarker::Deny => markers.deny.clone(),
        };

        MarkerEvent {
            kind,
            channel_id,
            message_id,
            user_id: sf(user_id),
            marker,
        }
    }

    pub async fn cast(&self, suggestion: &Suggestion, user_id: i64, vote: VoteMarker) -> VoteOutcome {
        let event = self.vote_event(suggestion, user_id, vote, MarkerKind::Added);
        VotingService::new(&self.ctx)
            .handle_marker(&event)
            .await
            .expect("vote handled")
    }

    pub async fn uncast(&self, suggestion: &Suggestion, user_id: i64, vote: VoteMarker) -> VoteOutcome {
        let event = self.vote_event(suggestion, user_id, vote, MarkerKind::Removed);
        VotingService::new(&self.ctx)
            .handle_marker(&event)
            .await
            .expect("vote handled")
    }
}

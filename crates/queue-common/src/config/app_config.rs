//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file if present).

use queue_core::{Marker, Snowflake, VoteMarker, VoteThresholds};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    /// `None` runs against the in-memory store
    pub database: Option<DatabaseConfig>,
    pub platform: PlatformConfig,
    pub queue: QueueSettings,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Messaging platform REST API settings
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    pub api_base: String,
    pub cdn_base: String,
    pub bot_token: String,
    pub bot_user_id: Snowflake,
    pub request_timeout: Duration,
}

/// Channels the queue reads from and writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfig {
    pub suggestions: Snowflake,
    pub council_queue: Snowflake,
    pub approval_queue: Snowflake,
    pub suggestions_log: Snowflake,
    pub council_changelog: Snowflake,
    pub bot_log: Snowflake,
}

impl ChannelConfig {
    /// Channels whose markers count as votes
    pub fn is_vote_channel(&self, channel_id: Snowflake) -> bool {
        channel_id == self.council_queue || channel_id == self.approval_queue
    }
}

/// Approve and deny vote markers (custom emoji)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerConfig {
    pub approve: Marker,
    pub deny: Marker,
}

impl MarkerConfig {
    /// Which vote a marker stands for, matched by custom emoji id
    pub fn classify(&self, marker: &Marker) -> Option<VoteMarker> {
        let id = marker.id()?;
        if self.approve.id() == Some(id) {
            Some(VoteMarker::Approve)
        } else if self.deny.id() == Some(id) {
            Some(VoteMarker::Deny)
        } else {
            None
        }
    }
}

/// Comparison workflow timings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonConfig {
    pub confirm_timeout: Duration,
    pub cooldown: Duration,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(default_confirm_timeout_secs()),
            cooldown: Duration::from_secs(default_cooldown_secs()),
        }
    }
}

/// The slice of configuration the queue services run on
#[derive(Debug, Clone)]
pub struct QueueSettings {
    pub bot_user_id: Snowflake,
    pub cdn_base: String,
    pub channels: ChannelConfig,
    pub markers: MarkerConfig,
    pub voting: VoteThresholds,
    pub comparison: ComparisonConfig,
}

// Default value functions
fn default_app_name() -> String {
    "emoji-queue".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_api_base() -> String {
    "https://discord.com/api/v10".to_string()
}

fn default_cdn_base() -> String {
    "https://cdn.discordapp.com".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_confirm_timeout_secs() -> u64 {
    60
}

fn default_cooldown_secs() -> u64 {
    5
}

/// Reads raw variables; kept separate from the process environment for tests
struct Vars<F> {
    lookup: F,
}

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn get(&self, name: &str) -> Option<String> {
        (self.lookup)(name).filter(|value| !value.trim().is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.get(name).ok_or(ConfigError::MissingVar(name))
    }

    fn parsed<T: FromStr>(&self, name: &'static str) -> Result<Option<T>, ConfigError> {
        self.get(name)
            .map(|raw| {
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue(name, raw.clone()))
            })
            .transpose()
    }

    fn required_parsed<T: FromStr>(&self, name: &'static str) -> Result<T, ConfigError> {
        self.parsed(name)?.ok_or(ConfigError::MissingVar(name))
    }

    fn marker(&self, name: &'static str) -> Result<Marker, ConfigError> {
        let raw = self.required(name)?;
        let marker = Marker::parse(&raw);
        if marker.id().is_none() {
            return Err(ConfigError::InvalidValue(name, raw));
        }
        Ok(marker)
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or unparsable
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars { lookup };

        let database = match vars.get("DATABASE_URL") {
            Some(url) => Some(DatabaseConfig {
                url,
                max_connections: vars
                    .parsed("DATABASE_MAX_CONNECTIONS")?
                    .unwrap_or_else(default_max_connections),
                min_connections: vars
                    .parsed("DATABASE_MIN_CONNECTIONS")?
                    .unwrap_or_else(default_min_connections),
            }),
            None => None,
        };

        let platform = PlatformConfig {
            api_base: vars.get("PLATFORM_API_BASE").unwrap_or_else(default_api_base),
            cdn_base: vars.get("PLATFORM_CDN_BASE").unwrap_or_else(default_cdn_base),
            bot_token: vars.required("BOT_TOKEN")?,
            bot_user_id: vars.required_parsed("BOT_USER_ID")?,
            request_timeout: Duration::from_secs(
                vars.parsed("PLATFORM_REQUEST_TIMEOUT_SECS")?
                    .unwrap_or_else(default_request_timeout_secs),
            ),
        };

        let channels = ChannelConfig {
            suggestions: vars.required_parsed("SUGGESTIONS_CHANNEL")?,
            council_queue: vars.required_parsed("COUNCIL_QUEUE_CHANNEL")?,
            approval_queue: vars.required_parsed("APPROVAL_QUEUE_CHANNEL")?,
            suggestions_log: vars.required_parsed("SUGGESTIONS_LOG_CHANNEL")?,
            council_changelog: vars.required_parsed("COUNCIL_CHANGELOG_CHANNEL")?,
            bot_log: vars.required_parsed("BOT_LOG_CHANNEL")?,
        };

        let defaults = VoteThresholds::default();
        let voting = VoteThresholds::new(
            vars.parsed("REQUIRED_VOTES")?
                .unwrap_or(defaults.required_votes),
            vars.parsed("REQUIRED_DIFFERENCE")?
                .unwrap_or(defaults.required_difference),
        );
        if voting.required_votes < 1 {
            return Err(ConfigError::InvalidValue(
                "REQUIRED_VOTES",
                voting.required_votes.to_string(),
            ));
        }

        let comparison = ComparisonConfig {
            confirm_timeout: Duration::from_secs(
                vars.parsed("VS_CONFIRM_TIMEOUT_SECS")?
                    .unwrap_or_else(default_confirm_timeout_secs),
            ),
            cooldown: Duration::from_secs(
                vars.parsed("VS_COOLDOWN_SECS")?
                    .unwrap_or_else(default_cooldown_secs),
            ),
        };

        Ok(Self {
            app: AppSettings {
                name: vars.get("APP_NAME").unwrap_or_else(default_app_name),
                env: vars
                    .get("APP_ENV")
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: vars.get("API_HOST").unwrap_or_else(default_host),
                port: vars.required_parsed("API_PORT")?,
            },
            database,
            queue: QueueSettings {
                bot_user_id: platform.bot_user_id,
                cdn_base: platform.cdn_base.clone(),
                channels,
                markers: MarkerConfig {
                    approve: vars.marker("APPROVE_EMOJI")?,
                    deny: vars.marker("DENY_EMOJI")?,
                },
                voting,
                comparison,
            },
            platform,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}

//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, ChannelConfig, ComparisonConfig, ConfigError, DatabaseConfig,
    Environment, MarkerConfig, PlatformConfig, QueueSettings, ServerConfig,
};

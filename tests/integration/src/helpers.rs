//! Test helpers for the HTTP API
//!
//! Spawns the real router on a local port, backed by the in-memory store
//! and the recording transport, and wraps a reqwest client around it.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use queue_api::{create_app, transport::ConfirmationRegistry, AppState};
use queue_common::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{test_settings, Harness};

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub harness: Harness,
    pub confirmations: Arc<ConfirmationRegistry>,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        let harness = Harness::new();
        let confirmations = Arc::new(ConfirmationRegistry::new());
        let state = AppState::new(
            harness.ctx.clone(),
            test_config()?,
            None,
            Arc::clone(&confirmations),
        );
        let app = create_app(state);

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            harness,
            confirmations,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }
}

/// Application configuration with the fixed test queue settings
pub fn test_config() -> Result<AppConfig> {
    let vars = HashMap::from([
        ("API_PORT", "0"),
        ("BOT_TOKEN", "test-token"),
        ("BOT_USER_ID", "1000"),
        ("SUGGESTIONS_CHANNEL", "1"),
        ("COUNCIL_QUEUE_CHANNEL", "2"),
        ("APPROVAL_QUEUE_CHANNEL", "3"),
        ("SUGGESTIONS_LOG_CHANNEL", "4"),
        ("COUNCIL_CHANGELOG_CHANNEL", "5"),
        ("BOT_LOG_CHANNEL", "6"),
        ("APPROVE_EMOJI", "blobupvote:9001"),
        ("DENY_EMOJI", "blobdownvote:9002"),
    ]);

    let mut config = AppConfig::from_lookup(|name| vars.get(name).map(|v| (*v).to_string()))
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))?;
    config.queue = test_settings();
    Ok(config)
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(response: Response, expected_status: StatusCode) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: serde_json::Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No error code in {body}"))
}

//! HTTP client for a Rasa-compatible NLU server.
//!
//! Only two endpoints are used: `GET /status` as a liveness probe and
//! `POST /model/parse` to classify a message. Training and serving the
//! model are managed outside this process.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Configuration for the remote NLU server.
#[derive(Debug, Clone, Deserialize)]
pub struct NluConfig {
    /// Base URL of the NLU HTTP API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Liveness probe timeout in seconds.
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Parse request timeout in seconds.
    #[serde(default = "default_parse_timeout_secs")]
    pub parse_timeout_secs: u64,
    /// Whether to consult the NLU server at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_base_url() -> String {
    "http://localhost:5005".into()
}
fn default_probe_timeout_secs() -> u64 {
    2
}
fn default_parse_timeout_secs() -> u64 {
    5
}
fn default_enabled() -> bool {
    true
}

impl Default for NluConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            probe_timeout_secs: default_probe_timeout_secs(),
            parse_timeout_secs: default_parse_timeout_secs(),
            enabled: default_enabled(),
        }
    }
}

/// Failure talking to the NLU server. Always absorbed by the resolver.
#[derive(Debug, thiserror::Error)]
pub enum NluError {
    #[error("nlu server unreachable: {0}")]
    RemoteUnreachable(String),

    #[error("nlu server returned HTTP {status}")]
    RemoteError { status: u16 },

    #[error("malformed nlu response: {0}")]
    MalformedRemoteResponse(String),
}

/// Intent classification returned by the NLU server.
#[derive(Debug, Clone, PartialEq)]
pub struct NluParse {
    /// Intent label, `"unknown"` if the server sent none.
    pub intent: String,
    /// Classifier confidence (0.0 - 1.0), 0.0 if absent.
    pub confidence: f64,
}

/// Remote classification backend consulted by `DelegatingResolver`.
#[async_trait]
pub trait NluBackend: Send + Sync {
    /// Whether the backend answers its liveness probe.
    async fn is_running(&self) -> bool;

    /// Classify a message.
    async fn parse(&self, text: &str) -> Result<NluParse, NluError>;
}

/// `/model/parse` request body.
#[derive(Serialize)]
struct ParseRequest<'a> {
    text: &'a str,
}

/// `/model/parse` response (only fields we need).
///
/// A missing `intent` key defaults; `"intent": null` does not.
#[derive(Deserialize)]
struct ParseResponse {
    #[serde(default)]
    intent: RawIntent,
}

#[derive(Default, Deserialize)]
struct RawIntent {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    confidence: Option<f64>,
}

/// Decode a `/model/parse` body. Both the body and its `intent` must be
/// JSON objects; serde would otherwise accept arrays for structs.
fn decode_parse(body: serde_json::Value) -> Result<NluParse, NluError> {
    let Some(fields) = body.as_object() else {
        return Err(NluError::MalformedRemoteResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&body)
        )));
    };
    match fields.get("intent") {
        None => {}
        Some(intent) if intent.is_object() => {}
        Some(other) => {
            return Err(NluError::MalformedRemoteResponse(format!(
                "expected `intent` to be an object, got {}",
                json_kind(other)
            )));
        }
    }

    let parsed: ParseResponse = serde_json::from_value(body)
        .map_err(|e| NluError::MalformedRemoteResponse(e.to_string()))?;

    Ok(NluParse {
        intent: parsed.intent.name.unwrap_or_else(|| "unknown".into()),
        confidence: parsed.intent.confidence.unwrap_or(0.0),
    })
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// reqwest-backed NLU server client.
pub struct NluClient {
    client: reqwest::Client,
    config: NluConfig,
}

impl NluClient {
    pub fn new(config: NluConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl NluBackend for NluClient {
    async fn is_running(&self) -> bool {
        let result = self
            .client
            .get(self.url("/status"))
            .timeout(Duration::from_secs(self.config.probe_timeout_secs))
            .send()
            .await;

        match result {
            Ok(resp) if resp.status() == reqwest::StatusCode::OK => true,
            Ok(resp) => {
                tracing::debug!(status = %resp.status(), "nlu status probe returned non-200");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "nlu status probe failed");
                false
            }
        }
    }

    async fn parse(&self, text: &str) -> Result<NluParse, NluError> {
        let response = self
            .client
            .post(self.url("/model/parse"))
            .timeout(Duration::from_secs(self.config.parse_timeout_secs))
            .json(&ParseRequest { text })
            .send()
            .await
            .map_err(|e| NluError::RemoteUnreachable(e.to_string()))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(NluError::RemoteError {
                status: status.as_u16(),
            });
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| NluError::MalformedRemoteResponse(e.to_string()))?;

        decode_parse(body)
    }
}

//! Shared test harness for E2E integration tests.
//!
//! Drives the full API router in-process via `tower::oneshot`, with the
//! intent resolver swappable for NLU delegation scenarios.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tokio::sync::broadcast;
use tower::ServiceExt;

use cb_api::events::WsEvent;
use cb_api::inference::{DelegatingResolver, IntentResolver, NluClient, NluConfig, RuleBasedMatcher};
use cb_api::routes::build_router;
use cb_api::state::AppState;
use cb_protocol::Bot;

/// End-to-end harness around an in-memory `AppState`.
pub struct TestHarness {
    /// API application state (in-memory, no DB).
    pub state: AppState,
    /// Axum router for HTTP requests via `tower::oneshot`.
    pub router: Router,
    /// WebSocket event receiver for asserting broadcast events.
    pub event_rx: broadcast::Receiver<WsEvent>,
    /// Per-harness dataset upload directory.
    pub upload_dir: PathBuf,
}

impl TestHarness {
    /// Sample bots, `admin`/`admin`, local matcher only.
    pub fn with_sample_data() -> Self {
        Self::build(AppState::with_sample_data())
    }

    /// Sample data with an explicit resolver.
    pub fn with_resolver(resolver: Arc<dyn IntentResolver>) -> Self {
        Self::build(AppState::with_sample_data().with_resolver(resolver))
    }

    /// Sample data with chat delegated to an NLU server at `base_url`.
    pub fn with_nlu(base_url: &str) -> Self {
        let config = NluConfig {
            base_url: base_url.to_string(),
            probe_timeout_secs: 1,
            parse_timeout_secs: 1,
            enabled: true,
        };
        Self::with_resolver(Arc::new(DelegatingResolver::new(
            RuleBasedMatcher::new(),
            Box::new(NluClient::new(config)),
        )))
    }

    fn build(state: AppState) -> Self {
        let upload_dir =
            std::env::temp_dir().join(format!("cb-e2e-{}", uuid::Uuid::new_v4()));
        let state = state.with_upload_dir(&upload_dir);
        let event_rx = state.event_tx.subscribe();
        let router = build_router(state.clone());
        Self {
            state,
            router,
            event_rx,
            upload_dir,
        }
    }

    /// Send a request and return (HTTP status, JSON body or `Null`).
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    /// JSON request with an optional bearer token.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        let req = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_vec(&body).unwrap()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    /// Log in and return the session token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, json) = self
            .request(
                "POST",
                "/api/v1/auth/login",
                None,
                Some(json!({"username": username, "password": password})),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login as '{username}' failed: {json}");
        json["token"].as_str().unwrap().to_string()
    }

    pub async fn admin_token(&self) -> String {
        self.login("admin", "admin").await
    }

    /// Register a regular user and return their session token.
    pub async fn user_token(&self, username: &str) -> String {
        let (status, _) = self
            .request(
                "POST",
                "/api/v1/auth/register",
                None,
                Some(json!({"username": username, "password": "secret"})),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        self.login(username, "secret").await
    }

    /// POST /api/v1/chat.
    pub async fn chat(&self, token: &str, bot_id: uuid::Uuid, message: &str) -> (StatusCode, Value) {
        self.request(
            "POST",
            "/api/v1/chat",
            Some(token),
            Some(json!({"bot_id": bot_id, "message": message})),
        )
        .await
    }

    /// Look up a seeded bot by display name.
    pub async fn sample_bot(&self, name: &str) -> Bot {
        let bots = self.state.bots.read().await;
        bots.iter()
            .find(|b| b.name == name)
            .cloned()
            .unwrap_or_else(|| panic!("no sample bot named '{name}'"))
    }

    /// Multipart upload of `contents` as the `dataset` field.
    pub async fn upload_dataset(
        &self,
        token: &str,
        bot_id: uuid::Uuid,
        filename: &str,
        contents: &str,
    ) -> (StatusCode, Value) {
        let boundary = "cb-e2e-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"dataset\"; filename=\"{filename}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\
             {contents}\r\n\
             --{boundary}--\r\n"
        );
        self.send(
            Request::post(format!("/api/v1/bots/{bot_id}/dataset"))
                .header("authorization", format!("Bearer {token}"))
                .header(
                    "content-type",
                    format!("multipart/form-data; boundary={boundary}"),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
    }
}

impl Drop for TestHarness {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

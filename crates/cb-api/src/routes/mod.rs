//! API route definitions and router builder.

pub mod accounts;
pub mod bots;
pub mod chat;
pub mod deploy;
pub mod health;
pub mod training;
pub mod ws;

use axum::Router;
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        // Account endpoints
        .route("/auth/register", post(accounts::register))
        .route("/auth/login", post(accounts::login))
        .route("/auth/logout", post(accounts::logout))
        .route("/auth/me", get(accounts::me))
        // Bot endpoints
        .route("/bots", get(bots::list_bots).post(bots::create_bot))
        .route("/bots/{id}", get(bots::get_bot))
        .route("/bots/{id}/analytics", get(training::analytics))
        .route(
            "/bots/{id}/dataset",
            get(training::export_dataset).post(training::import_dataset),
        )
        .route("/bots/{id}/train", post(training::train))
        .route("/bots/{id}/deploy", get(deploy::deploy_bot))
        // Chat
        .route("/chat", post(chat::chat))
        // WebSocket endpoint
        .route("/ws", get(ws::ws_handler));

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::inference::replies;

    fn app() -> Router {
        build_router(AppState::with_sample_data())
    }

    async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap()
        };
        (status, json)
    }

    fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap()
    }

    fn get_request(uri: &str, token: &str) -> Request<Body> {
        Request::get(uri)
            .header("authorization", format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> String {
        let (status, json) = send(
            app,
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"username": username, "password": password}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json["token"].as_str().unwrap().to_string()
    }

    async fn register_user(app: &Router, username: &str) -> String {
        let (status, _) = send(
            app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": username, "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        login(app, username, "pw").await
    }

    async fn first_bot_id(app: &Router, token: &str) -> String {
        let (_, bots) = send(app, get_request("/api/v1/bots", token)).await;
        bots[0]["id"].as_str().unwrap().to_string()
    }

    // ── Health & auth ───────────────────────────────────────────

    #[tokio::test]
    async fn health_returns_ok() {
        let (status, json) = send(
            &app(),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "ok");
    }

    #[tokio::test]
    async fn bots_require_login() {
        let (status, json) = send(
            &app(),
            Request::get("/api/v1/bots").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["status"], 401);
    }

    #[tokio::test]
    async fn bogus_token_rejected() {
        let (status, _) = send(&app(), get_request("/api/v1/bots", "bogus")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn login_sets_session_cookie() {
        let response = app()
            .oneshot(json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"username": "admin", "password": "admin"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()["set-cookie"].to_str().unwrap();
        assert!(cookie.starts_with("cb_session="));
        assert!(cookie.contains("HttpOnly"));
    }

    #[tokio::test]
    async fn cookie_session_authenticates() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (status, json) = send(
            &app,
            Request::get("/api/v1/auth/me")
                .header("cookie", format!("cb_session={token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["username"], "admin");
        assert_eq!(json["role"], "admin");
    }

    #[tokio::test]
    async fn wrong_password_rejected() {
        let (status, json) = send(
            &app(),
            json_request(
                "POST",
                "/api/v1/auth/login",
                None,
                json!({"username": "admin", "password": "nope"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(json["error"].as_str().unwrap().contains("invalid"));
    }

    #[tokio::test]
    async fn register_validations() {
        let app = app();
        let (status, json) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "  carol  ", "password": "pw", "role": "wizard"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["username"], "carol");
        assert_eq!(json["role"], "user");
        assert!(json.get("password_hash").is_none());

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "carol", "password": "other"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/auth/register",
                None,
                json!({"username": "   ", "password": "pw"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn logout_invalidates_session() {
        let app = app();
        let token = login(&app, "admin", "admin").await;

        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/auth/logout", Some(&token), json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&app, get_request("/api/v1/auth/me", &token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    // ── Bots ────────────────────────────────────────────────────

    #[tokio::test]
    async fn dashboard_lists_sample_bots_with_counts() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (status, json) = send(&app, get_request("/api/v1/bots", &token)).await;
        assert_eq!(status, StatusCode::OK);
        let bots = json.as_array().unwrap();
        assert_eq!(bots.len(), 24);
        assert!(bots.iter().all(|b| b["interaction_count"] == 6));
    }

    #[tokio::test]
    async fn create_and_fetch_bot() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/bots",
                Some(&token),
                json!({"name": "Shop Helper", "template": "retail", "personality": "casual"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(
            created["config_file"]
                .as_str()
                .unwrap()
                .starts_with("retail_")
        );

        let uri = format!("/api/v1/bots/{}", created["id"].as_str().unwrap());
        let (status, fetched) = send(&app, get_request(&uri, &token)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["name"], "Shop Helper");
        assert_eq!(fetched["personality"], "casual");
    }

    #[tokio::test]
    async fn create_bot_requires_name() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (status, _) = send(
            &app,
            json_request("POST", "/api/v1/bots", Some(&token), json!({"name": " "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_bot_is_404() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let uri = format!("/api/v1/bots/{}", uuid::Uuid::now_v7());
        let (status, _) = send(&app, get_request(&uri, &token)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // ── Chat ────────────────────────────────────────────────────

    #[tokio::test]
    async fn chat_resolves_and_logs() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (_, created) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/bots",
                Some(&token),
                json!({"name": "Formal", "template": "general", "personality": "formal"}),
            ),
        )
        .await;
        let bot_id = created["id"].as_str().unwrap();

        let (status, json) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/chat",
                Some(&token),
                json!({"bot_id": bot_id, "message": "HELLO"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["intent"], "greet");
        assert_eq!(json["response"], "Good day! How may I be of service?");

        let (_, analytics) = send(
            &app,
            get_request(&format!("/api/v1/bots/{bot_id}/analytics"), &token),
        )
        .await;
        assert_eq!(analytics["total_interactions"], 1);
        assert_eq!(analytics["top_intent"], "greet");
    }

    #[tokio::test]
    async fn chat_with_unknown_personality_uses_friendly() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (_, created) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/bots",
                Some(&token),
                json!({"name": "Odd", "personality": "grumpy"}),
            ),
        )
        .await;

        let (_, json) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/chat",
                Some(&token),
                json!({"bot_id": created["id"], "message": "bye"}),
            ),
        )
        .await;
        assert_eq!(json["intent"], "goodbye");
        assert_eq!(json["response"], "Goodbye! Have a great day! 👋");
    }

    #[tokio::test]
    async fn chat_unknown_bot_is_404() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let (status, _) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/chat",
                Some(&token),
                json!({"bot_id": uuid::Uuid::now_v7(), "message": "hi"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn chat_empty_message_is_unknown() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;
        let (status, json) = send(
            &app,
            json_request(
                "POST",
                "/api/v1/chat",
                Some(&token),
                json!({"bot_id": bot_id, "message": ""}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["intent"], "unknown");
        assert_eq!(json["response"], replies::UNKNOWN_REPLY);
    }

    // ── Analytics, dataset, training ────────────────────────────

    #[tokio::test]
    async fn sample_bot_analytics() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;
        let (status, json) = send(
            &app,
            get_request(&format!("/api/v1/bots/{bot_id}/analytics"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["total_interactions"], 6);
        assert_eq!(json["top_intent"], "greet");
        assert_eq!(json["intent_counts"]["greet"], 3);
        assert_eq!(json["intent_counts"]["goodbye"], 1);
    }

    #[tokio::test]
    async fn dataset_export_and_train() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;

        let (status, dataset) = send(
            &app,
            get_request(&format!("/api/v1/bots/{bot_id}/dataset"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let entries = dataset.as_array().unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0]["message"], "hello");
        assert_eq!(entries[0]["intent"], "greet");

        let (status, trained) = send(
            &app,
            json_request(
                "POST",
                &format!("/api/v1/bots/{bot_id}/train"),
                Some(&token),
                json!({}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trained["interactions_used"], 6);
        assert!(
            trained["message"]
                .as_str()
                .unwrap()
                .contains("6 recent interactions")
        );
    }

    #[tokio::test]
    async fn dataset_upload_saves_file() {
        let dir = std::env::temp_dir().join(format!("cb-routes-{}", uuid::Uuid::new_v4()));
        let app = build_router(AppState::with_sample_data().with_upload_dir(&dir));
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"dataset\"; filename=\"my faq.json\"\r\n\
             Content-Type: application/json\r\n\r\n\
             [{{\"message\":\"hi\"}}]\r\n\
             --{boundary}--\r\n"
        );
        let req = Request::post(format!("/api/v1/bots/{bot_id}/dataset"))
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, json) = send(&app, req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["filename"], "my_faq.json");

        let saved = dir.join(format!("{bot_id}_my_faq.json"));
        let contents = tokio::fs::read_to_string(&saved).await.unwrap();
        assert_eq!(contents, r#"[{"message":"hi"}]"#);

        tokio::fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn dataset_upload_without_file_is_400() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;

        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"action\"\r\n\r\n\
             import\r\n\
             --{boundary}--\r\n"
        );
        let req = Request::post(format!("/api/v1/bots/{bot_id}/dataset"))
            .header("authorization", format!("Bearer {token}"))
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    // ── Deploy ──────────────────────────────────────────────────

    #[tokio::test]
    async fn admin_gets_embed_snippet() {
        let app = app();
        let token = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &token).await;
        let (status, json) = send(
            &app,
            get_request(&format!("/api/v1/bots/{bot_id}/deploy"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let code = json["embed_code"].as_str().unwrap();
        assert!(code.contains(&format!("chatbot-{bot_id}")));
        assert!(code.contains(json["bot_name"].as_str().unwrap()));
    }

    #[tokio::test]
    async fn non_admin_cannot_deploy() {
        let app = app();
        let admin = login(&app, "admin", "admin").await;
        let bot_id = first_bot_id(&app, &admin).await;
        let token = register_user(&app, "dave").await;

        let (status, json) = send(
            &app,
            get_request(&format!("/api/v1/bots/{bot_id}/deploy"), &token),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert!(json["error"].as_str().unwrap().contains("admins"));
    }
}

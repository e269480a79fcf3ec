//! Registration, login and logout endpoints.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cb_protocol::{Role, User};

use crate::auth::{self, CurrentUser};
use crate::error::{ApiError, ApiResult};
use crate::state::{AppState, UserRecord};

/// Request body for creating an account.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    /// "admin" or "user" (default).
    #[serde(default)]
    pub role: Option<String>,
}

/// Request body for logging in.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login: the session token and who it belongs to.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

fn duplicate_username(username: &str) -> ApiError {
    ApiError::Conflict(format!("username '{username}' already exists"))
}

/// A unique violation on insert means another request took the username
/// after the existence check.
fn insert_error(err: sqlx::Error, username: &str) -> ApiError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return duplicate_username(username);
        }
    }
    err.into()
}

/// POST /api/v1/auth/register: create an account.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let username = req.username.trim();
    if username.is_empty() || req.password.is_empty() {
        return Err(ApiError::BadRequest(
            "username and password are required".into(),
        ));
    }

    let record = UserRecord {
        user: User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            role: req.role.as_deref().map(Role::from_label).unwrap_or_default(),
            created_at: Utc::now(),
        },
        password_hash: auth::spawn_hash_password(req.password).await?,
    };

    if let Some(pool) = &state.pool {
        if crate::db::users::exists(pool, username).await? {
            return Err(duplicate_username(username));
        }
        crate::db::users::insert(pool, &record)
            .await
            .map_err(|e| insert_error(e, username))?;
    } else {
        let mut users = state.users.write().await;
        if users.contains_key(username) {
            return Err(duplicate_username(username));
        }
        users.insert(username.to_string(), record.clone());
    }

    tracing::info!(username = %username, role = record.user.role.as_str(), "account registered");
    Ok((StatusCode::CREATED, Json(record.user)))
}

/// POST /api/v1/auth/login: verify credentials and open a session.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<([(axum::http::HeaderName, String); 1], Json<LoginResponse>)> {
    let username = req.username.trim();

    let record = if let Some(pool) = &state.pool {
        crate::db::users::get_by_username(pool, username).await?
    } else {
        state.users.read().await.get(username).cloned()
    };

    let verified = match record {
        Some(r) => auth::spawn_verify_password(req.password, r.password_hash)
            .await
            .then_some(r.user),
        None => None,
    };
    let Some(user) = verified else {
        tracing::info!(username = %username, "failed login attempt");
        return Err(ApiError::Unauthorized(
            "invalid username or password".into(),
        ));
    };

    let token = auth::new_session_token();
    if let Some(pool) = &state.pool {
        crate::db::sessions::insert(pool, &token, user.id).await?;
    } else {
        state.sessions.write().await.insert(token.clone(), user.id);
    }

    tracing::info!(username = %user.username, "logged in");
    Ok((
        [(SET_COOKIE, auth::session_cookie(&token))],
        Json(LoginResponse { token, user }),
    ))
}

/// POST /api/v1/auth/logout: end the current session.
pub async fn logout(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<(StatusCode, [(axum::http::HeaderName, String); 1])> {
    if let Some(pool) = &state.pool {
        crate::db::sessions::delete(pool, &current.token).await?;
    } else {
        state.sessions.write().await.remove(&current.token);
    }

    tracing::info!(username = %current.user.username, "logged out");
    Ok((
        StatusCode::NO_CONTENT,
        [(SET_COOKIE, auth::clear_session_cookie())],
    ))
}

/// GET /api/v1/auth/me: the logged-in account.
pub async fn me(current: CurrentUser) -> Json<User> {
    Json(current.user)
}

//! Password hashing, session tokens, and the `CurrentUser` extractor.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use uuid::Uuid;

use cb_protocol::User;

use crate::error::ApiError;
use crate::state::AppState;

/// Name of the session cookie set at login.
pub const SESSION_COOKIE: &str = "cb_session";

/// Hash a password into an Argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| ApiError::Internal(format!("salt encoding failed: {e}")))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ApiError::Internal(format!("password hashing failed: {e}")))
}

/// Check a password against a stored PHC string. Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// [`hash_password`] on the blocking pool, off the async workers.
pub async fn spawn_hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ApiError::Internal(format!("password hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool. A failed task never matches.
pub async fn spawn_verify_password(password: String, password_hash: String) -> bool {
    match tokio::task::spawn_blocking(move || verify_password(&password, &password_hash)).await {
        Ok(matched) => matched,
        Err(e) => {
            tracing::error!(error = %e, "password verification task failed");
            false
        }
    }
}

/// Generate a fresh opaque session token.
pub fn new_session_token() -> String {
    Uuid::new_v4().simple().to_string()
}

/// `Set-Cookie` value for a session token.
pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session.
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0")
}

/// Pull the session token from `Authorization: Bearer` or the session cookie.
pub fn session_token(parts: &Parts) -> Option<String> {
    let bearer = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    if bearer.is_some() {
        return bearer;
    }

    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|t| !t.is_empty())
}

/// Resolve a session token to its user.
pub async fn user_for_token(state: &AppState, token: &str) -> Result<Option<User>, ApiError> {
    if let Some(pool) = &state.pool {
        return Ok(crate::db::sessions::find_user(pool, token).await?);
    }

    let Some(user_id) = state.sessions.read().await.get(token).copied() else {
        return Ok(None);
    };
    let users = state.users.read().await;
    Ok(users
        .values()
        .find(|r| r.user.id == user_id)
        .map(|r| r.user.clone()))
}

/// The logged-in user making the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

impl CurrentUser {
    /// Reject non-admins with 403.
    pub fn require_admin(&self, action: &str) -> Result<(), ApiError> {
        if self.user.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(format!("only admins are allowed to {action}")))
        }
    }
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = session_token(parts)
            .ok_or_else(|| ApiError::Unauthorized("login required".into()))?;

        let user = user_for_token(state, &token)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("session is invalid or expired".into()))?;

        Ok(Self { user, token })
    }
}

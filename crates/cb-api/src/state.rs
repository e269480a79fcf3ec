//! Shared application state for the Axum server.
//!
//! Supports two modes:
//! - **Database mode**: uses `PgPool` for persistent storage (production).
//! - **In-memory mode**: uses `RwLock` collections (tests and development).

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;
use tokio::sync::{RwLock, broadcast};
use uuid::Uuid;

use cb_protocol::{Bot, InteractionRecord, Role, User};

use crate::events::WsEvent;
use crate::inference::{IntentResolver, RuleBasedMatcher};

/// Shared application state, wrapped in `Arc` for Axum handler sharing.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool (None in test/in-memory mode).
    pub pool: Option<PgPool>,
    /// In-memory accounts keyed by username (used when pool is None).
    pub users: Arc<RwLock<HashMap<String, UserRecord>>>,
    /// In-memory session tokens → user ID (used when pool is None).
    pub sessions: Arc<RwLock<HashMap<String, Uuid>>>,
    /// In-memory bots in creation order (used when pool is None).
    pub bots: Arc<RwLock<Vec<Bot>>>,
    /// In-memory interaction log (used when pool is None).
    pub interactions: Arc<RwLock<Vec<InteractionRecord>>>,
    /// Broadcast channel for real-time WebSocket events.
    pub event_tx: broadcast::Sender<WsEvent>,
    /// Intent resolver for chat messages.
    pub resolver: Arc<dyn IntentResolver>,
    /// Directory receiving uploaded training datasets.
    pub upload_dir: PathBuf,
}

/// A stored account with its password hash.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

impl AppState {
    /// Create state backed by a PostgreSQL pool.
    pub fn with_pool(pool: PgPool) -> Self {
        Self {
            pool: Some(pool),
            ..Self::new()
        }
    }

    /// Create in-memory state (for tests).
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            pool: None,
            users: Arc::new(RwLock::new(HashMap::new())),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            bots: Arc::new(RwLock::new(Vec::new())),
            interactions: Arc::new(RwLock::new(Vec::new())),
            event_tx,
            resolver: Arc::new(RuleBasedMatcher::new()),
            upload_dir: PathBuf::from("instance/training_data"),
        }
    }

    /// Create state with the stock sample bots and an `admin`/`admin` account.
    pub fn with_sample_data() -> Self {
        let mut bots = Vec::new();
        let mut interactions = Vec::new();
        for (bot, logs) in crate::seed::sample_bots() {
            bots.push(bot);
            interactions.extend(logs);
        }

        let mut users = HashMap::new();
        match crate::auth::hash_password("admin") {
            Ok(password_hash) => {
                users.insert(
                    "admin".to_string(),
                    UserRecord {
                        user: User {
                            id: Uuid::now_v7(),
                            username: "admin".into(),
                            role: Role::Admin,
                            created_at: Utc::now(),
                        },
                        password_hash,
                    },
                );
            }
            Err(e) => tracing::warn!(error = %e, "could not create sample admin account"),
        }

        Self {
            users: Arc::new(RwLock::new(users)),
            bots: Arc::new(RwLock::new(bots)),
            interactions: Arc::new(RwLock::new(interactions)),
            ..Self::new()
        }
    }

    /// Replace the intent resolver.
    pub fn with_resolver(mut self, resolver: Arc<dyn IntentResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the dataset upload directory.
    pub fn with_upload_dir(mut self, upload_dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = upload_dir.into();
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

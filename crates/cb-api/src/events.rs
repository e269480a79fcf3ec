//! Real-time event types broadcast over WebSocket connections.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Server-sent events pushed to dashboard WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsEvent {
    /// A new bot was created.
    BotCreated {
        bot_id: Uuid,
        name: String,
        template: String,
        personality: String,
        created_at: DateTime<Utc>,
    },

    /// A chat exchange was resolved and logged.
    InteractionLogged {
        bot_id: Uuid,
        intent: String,
        timestamp: DateTime<Utc>,
    },

    /// A training dataset was uploaded for a bot.
    DatasetImported {
        bot_id: Uuid,
        filename: String,
        size_bytes: usize,
        imported_at: DateTime<Utc>,
    },
}

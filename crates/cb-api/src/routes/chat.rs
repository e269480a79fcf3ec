//! Chat endpoint: resolve a message, log the exchange, return the reply.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cb_protocol::{Intent, InteractionRecord};

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::events::WsEvent;
use crate::routes::bots::find_bot;
use crate::state::AppState;

/// Request body for one chat turn.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub bot_id: Uuid,
    pub message: String,
}

/// Bot reply to one chat turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub intent: Intent,
}

/// POST /api/v1/chat: answer a message as the given bot.
pub async fn chat(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(req): Json<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    let bot = find_bot(&state, req.bot_id).await?;

    let resolution = state.resolver.resolve(&req.message, &bot.personality).await;
    let record = InteractionRecord::new(
        bot.id,
        &req.message,
        &resolution.reply,
        resolution.intent.clone(),
    );

    if let Some(pool) = &state.pool {
        crate::db::interactions::insert(pool, &record).await?;
    } else {
        state.interactions.write().await.push(record.clone());
    }

    tracing::info!(
        bot_id = %bot.id,
        intent = %record.intent,
        tier = state.resolver.tier_name(),
        "chat message resolved"
    );

    let _ = state.event_tx.send(WsEvent::InteractionLogged {
        bot_id: bot.id,
        intent: record.intent.to_string(),
        timestamp: record.timestamp,
    });

    Ok(Json(ChatResponse {
        response: resolution.reply,
        intent: resolution.intent,
    }))
}

//! Bot registry endpoints.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use serde::Deserialize;
use uuid::Uuid;

use cb_protocol::{Bot, BotSummary};

use crate::auth::CurrentUser;
use crate::error::{ApiError, ApiResult};
use crate::events::WsEvent;
use crate::state::AppState;

/// Request body for creating a bot.
#[derive(Debug, Deserialize)]
pub struct CreateBotRequest {
    pub name: String,
    #[serde(default = "default_template")]
    pub template: String,
    #[serde(default = "default_personality")]
    pub personality: String,
}

fn default_template() -> String {
    "general".into()
}

fn default_personality() -> String {
    "friendly".into()
}

/// Fetch a bot or fail with 404.
pub(crate) async fn find_bot(state: &AppState, bot_id: Uuid) -> ApiResult<Bot> {
    let bot = if let Some(pool) = &state.pool {
        crate::db::bots::get(pool, bot_id).await?
    } else {
        let bots = state.bots.read().await;
        bots.iter().find(|b| b.id == bot_id).cloned()
    };
    bot.ok_or_else(|| ApiError::NotFound(format!("bot '{bot_id}' not found")))
}

/// GET /api/v1/bots: dashboard listing with interaction counts.
pub async fn list_bots(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> ApiResult<Json<Vec<BotSummary>>> {
    if let Some(pool) = &state.pool {
        return Ok(Json(crate::db::bots::list_with_counts(pool).await?));
    }

    let bots = state.bots.read().await;
    let interactions = state.interactions.read().await;
    let summaries = bots
        .iter()
        .map(|bot| BotSummary {
            bot: bot.clone(),
            interaction_count: interactions.iter().filter(|i| i.bot_id == bot.id).count() as u64,
        })
        .collect();
    Ok(Json(summaries))
}

/// POST /api/v1/bots: create a bot.
pub async fn create_bot(
    State(state): State<AppState>,
    current: CurrentUser,
    Json(req): Json<CreateBotRequest>,
) -> ApiResult<(StatusCode, Json<Bot>)> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("bot name is required".into()));
    }

    let bot = Bot::new(name, req.template.trim(), req.personality.trim());

    if let Some(pool) = &state.pool {
        crate::db::bots::insert(pool, &bot).await?;
    } else {
        state.bots.write().await.push(bot.clone());
    }

    tracing::info!(
        bot_id = %bot.id,
        name = %bot.name,
        created_by = %current.user.username,
        "bot created"
    );

    let _ = state.event_tx.send(WsEvent::BotCreated {
        bot_id: bot.id,
        name: bot.name.clone(),
        template: bot.template.clone(),
        personality: bot.personality.clone(),
        created_at: bot.created_at,
    });

    Ok((StatusCode::CREATED, Json(bot)))
}

/// GET /api/v1/bots/{id}: bot details.
pub async fn get_bot(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(bot_id): Path<Uuid>,
) -> ApiResult<Json<Bot>> {
    find_bot(&state, bot_id).await.map(Json)
}

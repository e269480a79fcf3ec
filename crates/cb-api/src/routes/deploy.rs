//! Widget deployment endpoint (admins only).

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::routes::bots::find_bot;
use crate::state::AppState;
use crate::widget;

/// Embeddable snippet for a bot.
#[derive(Debug, Serialize)]
pub struct DeployResponse {
    pub bot_id: Uuid,
    pub bot_name: String,
    pub embed_code: String,
}

/// GET /api/v1/bots/{id}/deploy: generate the embed snippet.
pub async fn deploy_bot(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(bot_id): Path<Uuid>,
) -> ApiResult<Json<DeployResponse>> {
    current.require_admin("deploy chatbots")?;
    let bot = find_bot(&state, bot_id).await?;

    tracing::info!(bot_id = %bot.id, deployed_by = %current.user.username, "embed snippet generated");

    Ok(Json(DeployResponse {
        bot_id: bot.id,
        embed_code: widget::embed_snippet(&bot),
        bot_name: bot.name,
    }))
}

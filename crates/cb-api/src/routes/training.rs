//! Analytics, dataset export/import and training endpoints.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use cb_protocol::{DatasetEntry, IntentAnalytics, InteractionRecord};

use crate::auth::CurrentUser;
use crate::dataset;
use crate::error::{ApiError, ApiResult};
use crate::events::WsEvent;
use crate::routes::bots::find_bot;
use crate::state::AppState;

/// How many recent interactions a training run looks at.
pub const TRAINING_WINDOW: usize = 50;

/// Result of a dataset upload.
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub bot_id: Uuid,
    pub filename: String,
    pub size_bytes: usize,
}

/// Result of a training run.
#[derive(Debug, Serialize)]
pub struct TrainResponse {
    pub bot_id: Uuid,
    pub interactions_used: usize,
    pub message: String,
}

/// All interactions for a bot, oldest first.
async fn interactions_for(state: &AppState, bot_id: Uuid) -> ApiResult<Vec<InteractionRecord>> {
    if let Some(pool) = &state.pool {
        return Ok(crate::db::interactions::list_for_bot(pool, bot_id).await?);
    }
    let interactions = state.interactions.read().await;
    Ok(interactions
        .iter()
        .filter(|i| i.bot_id == bot_id)
        .cloned()
        .collect())
}

/// GET /api/v1/bots/{id}/analytics: interaction totals per intent.
pub async fn analytics(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(bot_id): Path<Uuid>,
) -> ApiResult<Json<IntentAnalytics>> {
    let bot = find_bot(&state, bot_id).await?;

    if let Some(pool) = &state.pool {
        let counts = crate::db::interactions::intent_counts(pool, bot.id).await?;
        let total = counts.values().sum();
        return Ok(Json(IntentAnalytics::from_counts(bot.id, total, counts)));
    }

    let interactions = state.interactions.read().await;
    let intents = interactions
        .iter()
        .filter(|i| i.bot_id == bot.id)
        .map(|i| &i.intent);
    Ok(Json(IntentAnalytics::from_intents(bot.id, intents)))
}

/// GET /api/v1/bots/{id}/dataset: export the interaction log as a dataset.
pub async fn export_dataset(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(bot_id): Path<Uuid>,
) -> ApiResult<Json<Vec<DatasetEntry>>> {
    let bot = find_bot(&state, bot_id).await?;
    let entries: Vec<DatasetEntry> = interactions_for(&state, bot.id)
        .await?
        .iter()
        .map(DatasetEntry::from)
        .collect();
    Ok(Json(entries))
}

/// POST /api/v1/bots/{id}/dataset: upload a training dataset file.
pub async fn import_dataset(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(bot_id): Path<Uuid>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<ImportResponse>)> {
    let bot = find_bot(&state, bot_id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some("dataset") {
            continue;
        }
        let raw_name = field.file_name().unwrap_or_default().to_string();
        let contents = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;
        upload = Some((raw_name, contents));
        break;
    }

    let (raw_name, contents) =
        upload.ok_or_else(|| ApiError::BadRequest("missing 'dataset' file field".into()))?;
    let filename = dataset::sanitize_filename(&raw_name)
        .ok_or_else(|| ApiError::BadRequest("dataset file needs a valid filename".into()))?;
    if contents.is_empty() {
        return Err(ApiError::BadRequest("dataset file is empty".into()));
    }

    let path = dataset::save_dataset(&state.upload_dir, bot.id, &filename, &contents)
        .await
        .map_err(|e| ApiError::Internal(format!("failed to store dataset: {e}")))?;

    tracing::info!(
        bot_id = %bot.id,
        path = %path.display(),
        size_bytes = contents.len(),
        uploaded_by = %current.user.username,
        "dataset imported"
    );

    let _ = state.event_tx.send(WsEvent::DatasetImported {
        bot_id: bot.id,
        filename: filename.clone(),
        size_bytes: contents.len(),
        imported_at: Utc::now(),
    });

    Ok((
        StatusCode::CREATED,
        Json(ImportResponse {
            bot_id: bot.id,
            filename,
            size_bytes: contents.len(),
        }),
    ))
}

/// POST /api/v1/bots/{id}/train: summarize the recent interaction window.
///
/// No model is trained; the summary reports how many recent interactions
/// a training run would use.
pub async fn train(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(bot_id): Path<Uuid>,
) -> ApiResult<Json<TrainResponse>> {
    let bot = find_bot(&state, bot_id).await?;

    let interactions_used = if let Some(pool) = &state.pool {
        crate::db::interactions::count_recent(pool, bot.id, TRAINING_WINDOW as i64).await? as usize
    } else {
        let interactions = state.interactions.read().await;
        interactions
            .iter()
            .filter(|i| i.bot_id == bot.id)
            .count()
            .min(TRAINING_WINDOW)
    };

    tracing::info!(bot_id = %bot.id, interactions_used, "training summary computed");

    Ok(Json(TrainResponse {
        bot_id: bot.id,
        interactions_used,
        message: format!(
            "Trained {} with {interactions_used} recent interactions!",
            bot.name
        ),
    }))
}

//! Interaction log queries.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cb_protocol::{Intent, InteractionRecord};

/// Interaction row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InteractionRow {
    pub id: Uuid,
    pub bot_id: Uuid,
    pub user_message: String,
    pub bot_response: String,
    pub intent: String,
    pub timestamp: DateTime<Utc>,
}

impl From<InteractionRow> for InteractionRecord {
    fn from(row: InteractionRow) -> Self {
        Self {
            id: row.id,
            bot_id: row.bot_id,
            user_message: row.user_message,
            bot_response: row.bot_response,
            intent: Intent::from_label(&row.intent),
            timestamp: row.timestamp,
        }
    }
}

/// Insert an interaction.
pub async fn insert(pool: &PgPool, record: &InteractionRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO interactions (id, bot_id, user_message, bot_response, intent, timestamp)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(record.id)
    .bind(record.bot_id)
    .bind(&record.user_message)
    .bind(&record.bot_response)
    .bind(record.intent.as_str())
    .bind(record.timestamp)
    .execute(pool)
    .await?;
    Ok(())
}

/// All interactions for a bot, oldest first.
pub async fn list_for_bot(
    pool: &PgPool,
    bot_id: Uuid,
) -> Result<Vec<InteractionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, InteractionRow>(
        "SELECT * FROM interactions WHERE bot_id = $1 ORDER BY timestamp",
    )
    .bind(bot_id)
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(InteractionRecord::from).collect())
}

/// Number of interactions among the bot's most recent `limit`.
pub async fn count_recent(pool: &PgPool, bot_id: Uuid, limit: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM (
             SELECT 1 FROM interactions WHERE bot_id = $1
             ORDER BY timestamp DESC LIMIT $2
         ) recent",
    )
    .bind(bot_id)
    .bind(limit)
    .fetch_one(pool)
    .await
}

/// Interaction counts per intent label for a bot.
pub async fn intent_counts(
    pool: &PgPool,
    bot_id: Uuid,
) -> Result<BTreeMap<String, u64>, sqlx::Error> {
    let rows = sqlx::query_as::<_, (String, i64)>(
        "SELECT intent, COUNT(*) FROM interactions WHERE bot_id = $1 GROUP BY intent",
    )
    .bind(bot_id)
    .fetch_all(pool)
    .await?;
    Ok(rows
        .into_iter()
        .map(|(intent, count)| (intent, count.max(0) as u64))
        .collect())
}

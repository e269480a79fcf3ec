//! Bot registry queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cb_protocol::{Bot, BotSummary};

/// Bot row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BotRow {
    pub id: Uuid,
    pub name: String,
    pub personality: String,
    pub template: String,
    pub config_file: String,
    pub created_at: DateTime<Utc>,
}

impl From<BotRow> for Bot {
    fn from(row: BotRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            personality: row.personality,
            template: row.template,
            config_file: row.config_file,
            created_at: row.created_at,
        }
    }
}

/// Dashboard row: bot columns plus its interaction count.
#[derive(Debug, Clone, sqlx::FromRow)]
struct BotCountRow {
    #[sqlx(flatten)]
    bot: BotRow,
    interaction_count: i64,
}

/// List all bots with their interaction counts, oldest first.
pub async fn list_with_counts(pool: &PgPool) -> Result<Vec<BotSummary>, sqlx::Error> {
    let rows = sqlx::query_as::<_, BotCountRow>(
        "SELECT b.*, COUNT(i.id) AS interaction_count
         FROM bots b LEFT JOIN interactions i ON i.bot_id = b.id
         GROUP BY b.id
         ORDER BY b.created_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| BotSummary {
            bot: r.bot.into(),
            interaction_count: r.interaction_count.max(0) as u64,
        })
        .collect())
}

/// Get a bot by ID.
pub async fn get(pool: &PgPool, bot_id: Uuid) -> Result<Option<Bot>, sqlx::Error> {
    let row = sqlx::query_as::<_, BotRow>("SELECT * FROM bots WHERE id = $1")
        .bind(bot_id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Bot::from))
}

/// Check whether a bot with this name, template and personality exists.
pub async fn exists_named(
    pool: &PgPool,
    name: &str,
    template: &str,
    personality: &str,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM bots WHERE name = $1 AND template = $2 AND personality = $3)",
    )
    .bind(name)
    .bind(template)
    .bind(personality)
    .fetch_one(pool)
    .await
}

/// Insert a new bot.
pub async fn insert(pool: &PgPool, bot: &Bot) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO bots (id, name, personality, template, config_file, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(bot.id)
    .bind(&bot.name)
    .bind(&bot.personality)
    .bind(&bot.template)
    .bind(&bot.config_file)
    .bind(bot.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

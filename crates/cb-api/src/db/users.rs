//! Account queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use cb_protocol::{Role, User};

use crate::state::UserRecord;

/// User row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            user: User {
                id: row.id,
                username: row.username,
                role: Role::from_label(&row.role),
                created_at: row.created_at,
            },
            password_hash: row.password_hash,
        }
    }
}

/// Get an account by username.
pub async fn get_by_username(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(UserRecord::from))
}

/// Check if a username is taken.
pub async fn exists(pool: &PgPool, username: &str) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(pool)
        .await
}

/// Insert a new account.
pub async fn insert(pool: &PgPool, record: &UserRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, role, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.user.id)
    .bind(&record.user.username)
    .bind(&record.password_hash)
    .bind(record.user.role.as_str())
    .bind(record.user.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

//! Login session queries.

use sqlx::PgPool;
use uuid::Uuid;

use cb_protocol::User;

use crate::db::users::UserRow;
use crate::state::UserRecord;

/// Record a new session token for a user.
pub async fn insert(pool: &PgPool, token: &str, user_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (token, user_id) VALUES ($1, $2)")
        .bind(token)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}

/// Look up the user owning a session token.
pub async fn find_user(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT u.* FROM sessions s JOIN users u ON u.id = s.user_id WHERE s.token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| UserRecord::from(r).user))
}

/// Delete a session token.
pub async fn delete(pool: &PgPool, token: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

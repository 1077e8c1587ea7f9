//! Registered users.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Insert a user unless one with the same id already exists.
///
/// Returns `true` when a new row was created.
pub async fn add_user(
    pool: &SqlitePool,
    user_id: i64,
    full_name: &str,
    username: Option<&str>,
) -> Result<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (user_id, full_name, username, start_date)
        VALUES (?1, ?2, ?3, ?4)
        ON CONFLICT(user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(full_name)
    .bind(username)
    .bind(Utc::now().to_rfc3339())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn users_count(pool: &SqlitePool) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

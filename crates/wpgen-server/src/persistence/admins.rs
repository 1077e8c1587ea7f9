//! Admin registry. Admins receive a notice for every new user.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Register an admin; existing entries are left as they are.
pub async fn add_admin(
    pool: &SqlitePool,
    user_id: i64,
    full_name: Option<&str>,
    username: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO admins (user_id, full_name, username, added_at)
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

    Ok(())
}

pub async fn is_admin(pool: &SqlitePool, user_id: i64) -> Result<bool> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM admins WHERE user_id = ?1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn admin_ids(pool: &SqlitePool) -> Result<Vec<i64>> {
    let rows: Vec<(i64,)> = sqlx::query_as("SELECT user_id FROM admins ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

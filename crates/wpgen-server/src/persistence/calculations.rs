//! Calculation history.

use anyhow::Result;
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use wpgen_core::CalculationRecord;

/// Insert one history row inside an open transaction.
pub async fn add_calculation_tx(
    tx: &mut Transaction<'_, Sqlite>,
    record: &CalculationRecord,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO calculations (user_id, coord_a, coord_b, segments, result, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(record.user_id)
    .bind(&record.coord_a)
    .bind(&record.coord_b)
    .bind(i64::from(record.segments))
    .bind(&record.result)
    .bind(Utc::now().to_rfc3339())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Insert one history row.
pub async fn add_calculation(pool: &SqlitePool, record: &CalculationRecord) -> Result<()> {
    let mut tx = pool.begin().await?;
    add_calculation_tx(&mut tx, record).await?;
    tx.commit().await?;
    Ok(())
}

/// Result strings of a user's most recent calculations, newest first.
pub async fn last_results(pool: &SqlitePool, user_id: i64, limit: u32) -> Result<Vec<String>> {
    let rows: Vec<(Option<String>,)> = sqlx::query_as(
        "SELECT result FROM calculations WHERE user_id = ?1 ORDER BY id DESC LIMIT ?2",
    )
    .bind(user_id)
    .bind(i64::from(limit))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().filter_map(|(result,)| result).collect())
}

//! Database connection and initialization.

use anyhow::{Context, Result};
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use std::path::Path;
use tracing::info;

/// Database connection wrapper.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Get the underlying connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Open (or create) the SQLite database and apply migrations.
pub async fn init_database(db_path: &str, max_connections: u32) -> Result<Database> {
    if let Some(parent) = Path::new(db_path).parent() {
        std::fs::create_dir_all(parent)?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path);
    info!("Connecting to database: {}", db_path);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .connect(&db_url)
        .await?;

    run_migrations(&pool).await?;

    Ok(Database { pool })
}

const SCHEMA_SQL: &str = include_str!("../../migrations/001_init.sql");

/// Apply the schema in one transaction. Every statement is idempotent, so
/// this runs on each start.
async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    let statements = schema_statements(SCHEMA_SQL);
    info!("Applying schema ({} statements)", statements.len());

    let mut tx = pool.begin().await?;
    for (idx, statement) in statements.iter().enumerate() {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("schema statement {} failed", idx + 1))?;
    }
    tx.commit().await?;
    Ok(())
}

/// Split a SQL script on `;`, dropping `--` comment lines and blanks.
fn schema_statements(sql: &str) -> Vec<String> {
    sql.split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
                .trim()
                .to_string()
        })
        .filter(|statement| !statement.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database() {
        let db = init_database(":memory:", 1).await.unwrap();

        let result: (i32,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master \
             WHERE type='table' AND name IN ('users', 'calculations', 'admins')",
        )
        .fetch_one(db.pool())
        .await
        .unwrap();

        assert_eq!(result.0, 3);
    }

    #[test]
    fn schema_statements_skip_comments() {
        let script = "-- header\nCREATE TABLE a (x INT);\n\n-- note\n;CREATE INDEX i ON a(x);\n";
        let statements = schema_statements(script);
        assert_eq!(statements, vec!["CREATE TABLE a (x INT)", "CREATE INDEX i ON a(x)"]);
        assert_eq!(schema_statements(SCHEMA_SQL).len(), 4);
    }

    #[tokio::test]
    async fn migrations_are_repeatable() {
        let db = init_database(":memory:", 1).await.unwrap();
        run_migrations(db.pool()).await.unwrap();
    }
}

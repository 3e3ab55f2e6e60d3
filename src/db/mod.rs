mod models;

pub use models::*;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{SqliteConnection, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

use crate::config::ConnectionConfig;

pub type DbPool = SqlitePool;

const SCHEMA_SQL: &str = include_str!("../../migrations/001_schema.sql");
const DATASET_SQL: &str = include_str!("../../seeds/dataset.sql");

/// Execute a SQL script statement by statement, properly handling comments
async fn execute_sql(conn: &mut SqliteConnection, sql: &str) -> Result<()> {
    for statement in sql.split(';') {
        // Strip SQL comment lines (lines starting with --)
        let cleaned: String = statement
            .lines()
            .filter(|line| !line.trim().starts_with("--"))
            .collect::<Vec<_>>()
            .join("\n");
        let trimmed = cleaned.trim();
        if !trimmed.is_empty() {
            sqlx::query(trimmed).execute(&mut *conn).await?;
        }
    }
    Ok(())
}

/// Open a pool for the given connection settings and make sure the schema exists.
pub async fn connect(config: &ConnectionConfig) -> Result<DbPool> {
    info!(url = %config.url, "Connecting to database");

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .with_context(|| format!("Invalid database URL: {}", config.url))?
        .foreign_keys(true);

    let mut pool_options =
        SqlitePoolOptions::new().acquire_timeout(Duration::from_secs(config.acquire_timeout_secs));

    if config.is_in_memory() {
        // Each connection to :memory: is its own database, so keep exactly one alive.
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
        }
        options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);
        pool_options = pool_options.max_connections(config.max_connections);
    }

    let pool = pool_options
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to connect to {}", config.url))?;

    apply_schema(&pool).await?;

    info!("Database ready");
    Ok(pool)
}

/// Create any missing tables. Safe to run on every startup.
pub async fn apply_schema(pool: &DbPool) -> Result<()> {
    let mut conn = pool.acquire().await?;
    execute_sql(&mut conn, SCHEMA_SQL)
        .await
        .context("Failed to apply database schema")
}

/// Replace every row with the bundled dataset.
pub async fn seed(pool: &DbPool) -> Result<()> {
    info!("Seeding database with bundled dataset");

    let mut tx = pool.begin().await?;
    execute_sql(&mut tx, DATASET_SQL)
        .await
        .context("Failed to load seed dataset")?;
    tx.commit().await?;

    Ok(())
}

//! SQLite pool construction and schema bootstrap.

use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::DatabaseConfig;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Stored timestamp layout: UTC, millisecond precision, lexicographically sortable
/// and understood by SQLite's `date()`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").map(|naive| naive.and_utc())
}

const SCHEMA: [&str; 5] = [
    r#"
    CREATE TABLE IF NOT EXISTS quotes (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quote_number TEXT UNIQUE NOT NULL,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        address TEXT NOT NULL,
        suburb TEXT NOT NULL,
        postcode TEXT NOT NULL,
        service_type TEXT NOT NULL,
        roof_type TEXT,
        timeframe TEXT,
        message TEXT,
        status TEXT NOT NULL DEFAULT 'new',
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS form_analytics (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        action TEXT NOT NULL,
        field TEXT,
        ip_address TEXT,
        user_agent TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_quotes_status ON quotes (status)",
    "CREATE INDEX IF NOT EXISTS idx_quotes_created_at ON quotes (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_form_analytics_created_at ON form_analytics (created_at)",
];

/// Open the connection pool described by `config`.
pub async fn connect(config: &DatabaseConfig) -> RepositoryResult<SqlitePool> {
    info!(url = %config.url, "Connecting to SQLite database");

    let mut options = SqliteConnectOptions::from_str(&config.url)
        .map_err(|e| {
            error!("Invalid database URL {}: {}", config.url, e);
            RepositoryError::connection(format!("Invalid database URL: {}", e))
        })?
        .create_if_missing(true)
        .busy_timeout(Duration::from_secs(config.connection_timeout_secs));

    let mut pool_options = SqlitePoolOptions::new()
        .acquire_timeout(Duration::from_secs(config.connection_timeout_secs));

    if config.is_in_memory() {
        debug!("In-memory database, pinning a single connection");
        pool_options = pool_options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    } else {
        options = options.journal_mode(SqliteJournalMode::Wal);
        pool_options = pool_options.max_connections(config.pool_size);
    }

    let pool = pool_options.connect_with(options).await.map_err(|e| {
        error!("Failed to open database: {}", e);
        RepositoryError::connection(format!("Failed to open database: {}", e))
    })?;
    info!("Connected to SQLite database");
    Ok(pool)
}

/// Create tables and indexes if they do not exist yet.
pub async fn init_schema(pool: &SqlitePool) -> RepositoryResult<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await.map_err(|e| {
            error!("Failed to initialise schema: {}", e);
            RepositoryError::database(format!("Failed to initialise schema: {}", e))
        })?;
    }
    info!("Quotes and analytics tables ready");
    Ok(())
}

/// `connect` followed by `init_schema`.
pub async fn open(config: &DatabaseConfig) -> RepositoryResult<SqlitePool> {
    let pool = connect(config).await?;
    init_schema(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format_and_parse() {
        let at = Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap();
        let raw = format_timestamp(at);
        assert_eq!(raw, "2026-03-07 09:05:01.000");
        assert_eq!(parse_timestamp(&raw).unwrap(), at);
    }

    #[test]
    fn test_parse_timestamp_without_fraction() {
        let parsed = parse_timestamp("2026-03-07 09:05:01").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 7, 9, 5, 1).unwrap());
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = open(&DatabaseConfig::from_test_env()).await.unwrap();
        init_schema(&pool).await.unwrap();
        let tables: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('quotes', 'form_analytics')",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(tables, 2);
    }
}

use crate::model::analytics::{AnalyticsSummary, NewAnalyticsEvent};
use crate::repository::database::format_timestamp;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use tracing::{debug, error, info};

/// Append-only store for form interaction events.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn insert(&self, event: NewAnalyticsEvent) -> RepositoryResult<i64>;
    async fn summarize_since(&self, since: DateTime<Utc>) -> RepositoryResult<Vec<AnalyticsSummary>>;
}

pub struct SqliteAnalyticsRepository {
    pool: SqlitePool,
}

impl SqliteAnalyticsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteAnalyticsRepository { pool }
    }
}

#[async_trait]
impl AnalyticsRepository for SqliteAnalyticsRepository {
    #[tracing::instrument(skip(self, event), fields(action = %event.action))]
    async fn insert(&self, event: NewAnalyticsEvent) -> RepositoryResult<i64> {
        debug!(field = ?event.field, "Recording analytics event");
        let result = sqlx::query(
            "INSERT INTO form_analytics (action, field, ip_address, user_agent, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&event.action)
        .bind(&event.field)
        .bind(&event.ip_address)
        .bind(&event.user_agent)
        .bind(format_timestamp(Utc::now()))
        .execute(&self.pool)
        .await;
        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(e) => {
                error!("Failed to insert analytics event: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn summarize_since(&self, since: DateTime<Utc>) -> RepositoryResult<Vec<AnalyticsSummary>> {
        let result = sqlx::query_as::<_, AnalyticsSummary>(
            r#"
            SELECT action, field, date(created_at) AS date, COUNT(*) AS count
            FROM form_analytics
            WHERE created_at >= ?
            GROUP BY action, field, date(created_at)
            ORDER BY date DESC, count DESC, action ASC
            "#,
        )
        .bind(format_timestamp(since))
        .fetch_all(&self.pool)
        .await;
        match result {
            Ok(rows) => {
                info!("Summarized analytics into {} groups", rows.len());
                Ok(rows)
            }
            Err(e) => {
                error!("Failed to summarize analytics: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }
}

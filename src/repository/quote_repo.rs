use crate::model::quote::{NewQuote, QuoteRequest, QuoteStatus};
use crate::repository::database::format_timestamp;
use crate::repository::repository_error::{RepositoryError, RepositoryResult};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqlitePool;
use tracing::{error, info, warn};

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn create(&self, quote: NewQuote) -> RepositoryResult<QuoteRequest>;
    async fn get_by_id(&self, id: i64) -> RepositoryResult<QuoteRequest>;
    async fn get_by_quote_number(&self, quote_number: &str) -> RepositoryResult<QuoteRequest>;
    async fn list(
        &self,
        status: Option<QuoteStatus>,
        limit: u32,
        offset: u32,
    ) -> RepositoryResult<Vec<QuoteRequest>>;
    async fn update_status(&self, id: i64, status: QuoteStatus) -> RepositoryResult<()>;
    async fn count(&self, status: Option<QuoteStatus>) -> RepositoryResult<u64>;
    async fn count_created_on(&self, date: NaiveDate) -> RepositoryResult<u64>;
}

pub struct SqliteQuoteRepository {
    pool: SqlitePool,
}

impl SqliteQuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SqliteQuoteRepository { pool }
    }
}

#[async_trait]
impl QuoteRepository for SqliteQuoteRepository {
    #[tracing::instrument(skip(self, quote), fields(quote_number = %quote.quote_number))]
    async fn create(&self, quote: NewQuote) -> RepositoryResult<QuoteRequest> {
        info!("Creating new quote");
        let now = Utc::now();
        let timestamp = format_timestamp(now);

        let result = sqlx::query(
            r#"
            INSERT INTO quotes (
                quote_number, first_name, last_name, email, phone,
                address, suburb, postcode, service_type, roof_type,
                timeframe, message, status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&quote.quote_number)
        .bind(&quote.first_name)
        .bind(&quote.last_name)
        .bind(&quote.email)
        .bind(&quote.phone)
        .bind(&quote.address)
        .bind(&quote.suburb)
        .bind(&quote.postcode)
        .bind(&quote.service_type)
        .bind(&quote.roof_type)
        .bind(&quote.timeframe)
        .bind(&quote.message)
        .bind(QuoteStatus::New.as_str())
        .bind(&timestamp)
        .bind(&timestamp)
        .execute(&self.pool)
        .await;

        match result {
            Ok(done) => {
                let id = done.last_insert_rowid();
                info!(id, "Quote created successfully");
                // Read back so the caller sees exactly what was stored.
                self.get_by_id(id).await
            }
            Err(e) => {
                let err = RepositoryError::from(e);
                match &err {
                    RepositoryError::AlreadyExists(_) => {
                        warn!("Quote number collision: {}", quote.quote_number)
                    }
                    _ => error!("Failed to create quote: {}", err),
                }
                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_id(&self, id: i64) -> RepositoryResult<QuoteRequest> {
        info!("Fetching quote by ID: {}", id);
        let result = sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        match result {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => {
                info!("Quote not found for ID: {}", id);
                Err(RepositoryError::not_found(format!("Quote not found for ID: {}", id)))
            }
            Err(e) => {
                error!("Failed to fetch quote by ID: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn get_by_quote_number(&self, quote_number: &str) -> RepositoryResult<QuoteRequest> {
        info!("Fetching quote by number: {}", quote_number);
        let result =
            sqlx::query_as::<_, QuoteRequest>("SELECT * FROM quotes WHERE quote_number = ?")
                .bind(quote_number)
                .fetch_optional(&self.pool)
                .await;
        match result {
            Ok(Some(quote)) => Ok(quote),
            Ok(None) => {
                info!("Quote not found for number: {}", quote_number);
                Err(RepositoryError::not_found(format!(
                    "Quote not found for number: {}",
                    quote_number
                )))
            }
            Err(e) => {
                error!("Failed to fetch quote by number: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list(
        &self,
        status: Option<QuoteStatus>,
        limit: u32,
        offset: u32,
    ) -> RepositoryResult<Vec<QuoteRequest>> {
        info!("Listing quotes with status: {:?}, limit: {}, offset: {}", status, limit, offset);
        let query = match status {
            Some(status) => sqlx::query_as::<_, QuoteRequest>(
                "SELECT * FROM quotes WHERE status = ? ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            )
            .bind(status.as_str()),
            None => sqlx::query_as::<_, QuoteRequest>(
                "SELECT * FROM quotes ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
            ),
        };
        let result = query
            .bind(i64::from(limit))
            .bind(i64::from(offset))
            .fetch_all(&self.pool)
            .await;
        match result {
            Ok(quotes) => {
                info!("Fetched {} quotes", quotes.len());
                Ok(quotes)
            }
            Err(e) => {
                error!("Failed to list quotes: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self), fields(status = %status))]
    async fn update_status(&self, id: i64, status: QuoteStatus) -> RepositoryResult<()> {
        info!(quote_id = id, status = %status, "Updating quote status");
        let result = sqlx::query("UPDATE quotes SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(format_timestamp(Utc::now()))
            .bind(id)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) if done.rows_affected() > 0 => {
                info!("Quote status updated successfully for ID: {}", id);
                Ok(())
            }
            Ok(_) => {
                info!("No quote found to update status for ID: {}", id);
                Err(RepositoryError::not_found(format!(
                    "No quote found to update status for ID: {}",
                    id
                )))
            }
            Err(e) => {
                error!("Failed to update quote status: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn count(&self, status: Option<QuoteStatus>) -> RepositoryResult<u64> {
        let query = match status {
            Some(status) => {
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes WHERE status = ?")
                    .bind(status.as_str())
            }
            None => sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes"),
        };
        match query.fetch_one(&self.pool).await {
            Ok(count) => {
                info!("Quotes count: {}", count);
                Ok(count.max(0) as u64)
            }
            Err(e) => {
                error!("Failed to count quotes: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn count_created_on(&self, date: NaiveDate) -> RepositoryResult<u64> {
        let result = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM quotes WHERE date(created_at) = ?",
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_one(&self.pool)
        .await;
        match result {
            Ok(count) => {
                info!("Quotes created on {}: {}", date, count);
                Ok(count.max(0) as u64)
            }
            Err(e) => {
                error!("Failed to count quotes for {}: {}", date, e);
                Err(RepositoryError::from(e))
            }
        }
    }
}

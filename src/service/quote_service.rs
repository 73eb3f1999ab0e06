use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, instrument, warn};

use crate::dto::quote_dto::{CreateQuoteRequest, SubmittedQuote};
use crate::middlewares::client_context::ClientContext;
use crate::model::quote::{QuoteRequest, QuoteStatus};
use crate::repository::quote_repo::QuoteRepository;
use crate::service::analytics_service::{spawn_record, AnalyticsService, FORM_SUBMIT_ACTION};
use crate::util::error::ServiceError;
use crate::util::quote_number::{ClockQuoteNumberGenerator, QuoteNumberGenerator};

pub const DEFAULT_LIST_LIMIT: u32 = 50;

/// How `get_quote` resolves its identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteLookup {
    Id(i64),
    QuoteNumber(String),
    /// All digits but too large to be a row id.
    Unresolvable,
}

impl QuoteLookup {
    pub fn parse(identifier: &str) -> Self {
        if !identifier.is_empty() && identifier.bytes().all(|b| b.is_ascii_digit()) {
            identifier
                .parse::<i64>()
                .map(QuoteLookup::Id)
                .unwrap_or(QuoteLookup::Unresolvable)
        } else {
            QuoteLookup::QuoteNumber(identifier.to_string())
        }
    }
}

#[async_trait]
pub trait QuoteService: Send + Sync {
    async fn submit_quote(
        &self,
        request: CreateQuoteRequest,
        client: ClientContext,
    ) -> Result<SubmittedQuote, ServiceError>;
    async fn get_quote(&self, identifier: &str) -> Result<QuoteRequest, ServiceError>;
    async fn list_quotes(
        &self,
        status: Option<QuoteStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<QuoteRequest>, ServiceError>;
    async fn update_quote_status(&self, id: &str, status: &str) -> Result<(), ServiceError>;
}

pub struct QuoteServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
    pub analytics: Arc<dyn AnalyticsService>,
    pub quote_numbers: Arc<dyn QuoteNumberGenerator>,
}

impl QuoteServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>, analytics: Arc<dyn AnalyticsService>) -> Self {
        QuoteServiceImpl {
            quote_repo,
            analytics,
            quote_numbers: Arc::new(ClockQuoteNumberGenerator),
        }
    }

    pub fn with_quote_numbers(mut self, quote_numbers: Arc<dyn QuoteNumberGenerator>) -> Self {
        self.quote_numbers = quote_numbers;
        self
    }
}

#[async_trait]
impl QuoteService for QuoteServiceImpl {
    #[instrument(skip(self, request, client))]
    async fn submit_quote(
        &self,
        request: CreateQuoteRequest,
        client: ClientContext,
    ) -> Result<SubmittedQuote, ServiceError> {
        info!("Registering new quote request");

        let missing = request.missing_fields();
        if !missing.is_empty() {
            warn!(missing = ?missing, "Rejecting quote with missing required fields");
            return Err(ServiceError::Validation(format!(
                "All required fields must be provided (missing: {})",
                missing.join(", ")
            )));
        }

        let quote_number = self.quote_numbers.generate();
        let created = self
            .quote_repo
            .create(request.into_new_quote(quote_number))
            .await
            .map_err(|e| {
                error!("Failed to save quote request: {e}");
                ServiceError::from(e)
            })?;

        spawn_record(Arc::clone(&self.analytics), FORM_SUBMIT_ACTION, None, client);

        info!(id = created.id, quote_number = %created.quote_number, "Quote registered successfully");
        Ok(SubmittedQuote {
            id: created.id,
            quote_number: created.quote_number,
        })
    }

    #[instrument(skip(self))]
    async fn get_quote(&self, identifier: &str) -> Result<QuoteRequest, ServiceError> {
        info!("Getting quote");
        let res = match QuoteLookup::parse(identifier) {
            QuoteLookup::Id(id) => self.quote_repo.get_by_id(id).await,
            QuoteLookup::QuoteNumber(number) => self.quote_repo.get_by_quote_number(&number).await,
            QuoteLookup::Unresolvable => {
                info!("Identifier out of id range");
                return Err(ServiceError::NotFound("Quote not found".to_string()));
            }
        };
        match res {
            Ok(quote) => {
                info!("Quote fetched successfully");
                Ok(quote)
            }
            Err(e) => match ServiceError::from(e) {
                ServiceError::NotFound(_) => Err(ServiceError::NotFound("Quote not found".to_string())),
                other => {
                    error!("Failed to fetch quote: {other}");
                    Err(other)
                }
            },
        }
    }

    #[instrument(skip(self))]
    async fn list_quotes(
        &self,
        status: Option<QuoteStatus>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<QuoteRequest>, ServiceError> {
        info!("Listing quotes");
        let res = self.quote_repo.list(status, limit, offset).await;
        match &res {
            Ok(quotes) => info!("Fetched {} quotes", quotes.len()),
            Err(e) => error!("Failed to list quotes: {e}"),
        }
        res.map_err(ServiceError::from)
    }

    #[instrument(skip(self))]
    async fn update_quote_status(&self, id: &str, status: &str) -> Result<(), ServiceError> {
        info!("Updating quote status");
        let status = status
            .parse::<QuoteStatus>()
            .map_err(|_| ServiceError::Validation("Invalid status".to_string()))?;
        let id = match QuoteLookup::parse(id) {
            QuoteLookup::Id(id) => id,
            _ => return Err(ServiceError::NotFound("Quote not found".to_string())),
        };
        let res = self.quote_repo.update_status(id, status).await;
        match res {
            Ok(()) => {
                info!("Quote status updated successfully");
                Ok(())
            }
            Err(e) => match ServiceError::from(e) {
                ServiceError::NotFound(_) => Err(ServiceError::NotFound("Quote not found".to_string())),
                other => {
                    error!("Failed to update quote status: {other}");
                    Err(other)
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_dispatch() {
        assert_eq!(QuoteLookup::parse("42"), QuoteLookup::Id(42));
        assert_eq!(QuoteLookup::parse("007"), QuoteLookup::Id(7));
        assert_eq!(
            QuoteLookup::parse("PRS-20260105-07030904"),
            QuoteLookup::QuoteNumber("PRS-20260105-07030904".to_string())
        );
        assert_eq!(QuoteLookup::parse("-1"), QuoteLookup::QuoteNumber("-1".to_string()));
        assert_eq!(QuoteLookup::parse("12a"), QuoteLookup::QuoteNumber("12a".to_string()));
        assert_eq!(QuoteLookup::parse("99999999999999999999"), QuoteLookup::Unresolvable);
    }
}

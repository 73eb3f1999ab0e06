use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::dto::dashboard_dto::DashboardStats;
use crate::model::quote::QuoteStatus;
use crate::repository::quote_repo::QuoteRepository;
use crate::util::error::ServiceError;

pub const RECENT_QUOTES_LIMIT: u32 = 5;

#[async_trait]
pub trait DashboardService: Send + Sync {
    async fn stats(&self) -> Result<DashboardStats, ServiceError>;
}

pub struct DashboardServiceImpl {
    pub quote_repo: Arc<dyn QuoteRepository>,
}

impl DashboardServiceImpl {
    pub fn new(quote_repo: Arc<dyn QuoteRepository>) -> Self {
        DashboardServiceImpl { quote_repo }
    }
}

#[async_trait]
impl DashboardService for DashboardServiceImpl {
    /// All four aggregates or none.
    #[instrument(skip(self))]
    async fn stats(&self) -> Result<DashboardStats, ServiceError> {
        info!("Collecting dashboard stats");
        let today = Utc::now().date_naive();
        let res = tokio::try_join!(
            self.quote_repo.count(None),
            self.quote_repo.count(Some(QuoteStatus::New)),
            self.quote_repo.count_created_on(today),
            self.quote_repo.list(None, RECENT_QUOTES_LIMIT, 0),
        );
        match res {
            Ok((total_quotes, new_quotes, today_quotes, recent_quotes)) => Ok(DashboardStats {
                total_quotes,
                new_quotes,
                today_quotes,
                recent_quotes,
            }),
            Err(e) => {
                error!("Failed to collect dashboard stats: {e}");
                Err(ServiceError::from(e))
            }
        }
    }
}

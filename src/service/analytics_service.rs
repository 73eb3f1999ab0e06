use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{error, info, instrument, warn};

use crate::middlewares::client_context::ClientContext;
use crate::model::analytics::{AnalyticsSummary, NewAnalyticsEvent};
use crate::repository::analytics_repo::AnalyticsRepository;
use crate::util::error::ServiceError;

pub const FORM_SUBMIT_ACTION: &str = "form_submit";
pub const DEFAULT_SUMMARY_DAYS: u32 = 7;

#[async_trait]
pub trait AnalyticsService: Send + Sync {
    /// Best-effort append. Failures are logged here and never returned.
    async fn record(&self, action: &str, field: Option<String>, client: &ClientContext);

    /// Per `(action, field, date)` counts over the trailing `days` days.
    async fn summarize(&self, days: u32) -> Result<Vec<AnalyticsSummary>, ServiceError>;
}

/// Run `record` on its own task; the caller never waits for or observes the outcome.
pub fn spawn_record(
    analytics: Arc<dyn AnalyticsService>,
    action: &str,
    field: Option<String>,
    client: ClientContext,
) {
    let action = action.to_string();
    tokio::spawn(async move {
        analytics.record(&action, field, &client).await;
    });
}

pub struct AnalyticsServiceImpl {
    pub analytics_repo: Arc<dyn AnalyticsRepository>,
}

impl AnalyticsServiceImpl {
    pub fn new(analytics_repo: Arc<dyn AnalyticsRepository>) -> Self {
        AnalyticsServiceImpl { analytics_repo }
    }
}

fn window_start(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|span| now.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[async_trait]
impl AnalyticsService for AnalyticsServiceImpl {
    #[instrument(skip(self, client), fields(ip = ?client.ip_address))]
    async fn record(&self, action: &str, field: Option<String>, client: &ClientContext) {
        if action.trim().is_empty() {
            warn!("Dropping analytics event without an action");
            return;
        }
        let event = NewAnalyticsEvent {
            action: action.to_string(),
            field,
            ip_address: client.ip_address.clone(),
            user_agent: client.user_agent.clone(),
        };
        match self.analytics_repo.insert(event).await {
            Ok(id) => info!(id, "Analytics event recorded"),
            Err(e) => error!("Analytics logging error: {e}"),
        }
    }

    #[instrument(skip(self))]
    async fn summarize(&self, days: u32) -> Result<Vec<AnalyticsSummary>, ServiceError> {
        info!("Summarizing analytics");
        let since = window_start(Utc::now(), days);
        let res = self.analytics_repo.summarize_since(since).await;
        match &res {
            Ok(rows) => info!("Fetched {} analytics groups", rows.len()),
            Err(e) => error!("Failed to summarize analytics: {e}"),
        }
        res.map_err(ServiceError::from)
    }
}

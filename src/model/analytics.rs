use serde::{Deserialize, Serialize};

/// One UI interaction to append to `form_analytics`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAnalyticsEvent {
    pub action: String,
    pub field: Option<String>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

/// Event count for one `(action, field, date)` group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct AnalyticsSummary {
    pub action: String,
    pub field: Option<String>,
    pub date: String,
    pub count: i64,
}

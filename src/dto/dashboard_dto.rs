use crate::model::quote::QuoteRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_quotes: u64,
    pub new_quotes: u64,
    pub today_quotes: u64,
    pub recent_quotes: Vec<QuoteRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub success: bool,
    pub stats: DashboardStats,
}

use crate::model::analytics::AnalyticsSummary;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/analytics`. Anything unusable is dropped rather than rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordAnalyticsRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsResponse {
    pub success: bool,
    pub analytics: Vec<AnalyticsSummary>,
}

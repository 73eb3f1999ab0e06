use axum::extract::rejection::JsonRejection;
use axum::{extract::{Query, State}, response::IntoResponse, Json};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

use crate::dto::analytics_dto::{AnalyticsResponse, RecordAnalyticsRequest, SuccessResponse};
use crate::middlewares::client_context::ClientContext;
use crate::service::analytics_service::{
    spawn_record, AnalyticsService, AnalyticsServiceImpl, DEFAULT_SUMMARY_DAYS,
};
use crate::util::error::HandlerError;

// Handler: Record analytics event. Always acknowledges.
pub async fn record_analytics_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    client: ClientContext,
    payload: Result<Json<RecordAnalyticsRequest>, JsonRejection>,
) -> impl IntoResponse {
    match payload {
        Ok(Json(RecordAnalyticsRequest { action, field })) => {
            let analytics: Arc<dyn AnalyticsService> = service;
            spawn_record(analytics, action.as_deref().unwrap_or_default(), field, client);
        }
        Err(e) => warn!("[record_analytics_handler] Ignoring unreadable event: {}", e.body_text()),
    }
    Json(SuccessResponse { success: true })
}

// Handler: Analytics summary for the trailing `days` days
pub async fn analytics_summary_handler(
    State(service): State<Arc<AnalyticsServiceImpl>>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, HandlerError> {
    let days = params
        .get("days")
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_SUMMARY_DAYS);
    let analytics = service
        .summarize(days)
        .await
        .map_err(|e| HandlerError::from_service(e, "Error retrieving analytics"))?;
    Ok(Json(AnalyticsResponse {
        success: true,
        analytics,
    }))
}

use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;

use crate::dto::dashboard_dto::DashboardStatsResponse;
use crate::service::dashboard_service::{DashboardService, DashboardServiceImpl};
use crate::util::error::HandlerError;

pub async fn dashboard_stats_handler(
    State(service): State<Arc<DashboardServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let stats = service
        .stats()
        .await
        .map_err(|e| HandlerError::from_service(e, "Error retrieving dashboard stats"))?;
    Ok(Json(DashboardStatsResponse {
        success: true,
        stats,
    }))
}

use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handler::dashboard_handler::dashboard_stats_handler;
use crate::service::dashboard_service::DashboardServiceImpl;

pub fn dashboard_router(service: Arc<DashboardServiceImpl>) -> Router {
    Router::new()
        .route("/api/dashboard/stats", get(dashboard_stats_handler))
        .with_state(service)
}

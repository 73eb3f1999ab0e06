use axum::{routing::get, Router};
use std::sync::Arc;

use crate::handler::analytics_handler::{analytics_summary_handler, record_analytics_handler};
use crate::service::analytics_service::AnalyticsServiceImpl;

pub fn analytics_router(service: Arc<AnalyticsServiceImpl>) -> Router {
    Router::new()
        .route(
            "/api/analytics",
            get(analytics_summary_handler).post(record_analytics_handler),
        )
        .with_state(service)
}

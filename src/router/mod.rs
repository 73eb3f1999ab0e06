pub mod analytics_router;
pub mod dashboard_router;
pub mod quote_router;

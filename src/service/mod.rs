pub mod analytics_service;
pub mod dashboard_service;
pub mod quote_service;

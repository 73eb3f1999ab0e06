pub mod analytics_dto;
pub mod dashboard_dto;
pub mod quote_dto;

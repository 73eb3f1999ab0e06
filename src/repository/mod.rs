pub mod analytics_repo;
pub mod database;
pub mod quote_repo;
pub mod repository_error;

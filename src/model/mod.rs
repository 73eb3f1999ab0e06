pub mod analytics;
pub mod quote;

pub mod analytics_handler;
pub mod dashboard_handler;
pub mod quote_handler;

use crate::util::error::HandlerError;

/// Uniform JSON 404 for any route the API does not define.
pub async fn not_found_handler() -> HandlerError {
    HandlerError::not_found("Endpoint not found")
}

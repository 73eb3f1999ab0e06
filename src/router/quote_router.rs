use axum::{middleware, routing::{get, post, put}, Router};
use std::sync::Arc;

use crate::handler::quote_handler::{
    create_quote_handler, get_quote_handler, list_quotes_handler, update_quote_status_handler,
};
use crate::middlewares::rate_limit_middleware::rate_limit;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::rate_limiter::RateLimiter;

pub fn quote_router(service: Arc<QuoteServiceImpl>, limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        // The throttle wraps only the POST; `get` is added after the layer.
        .route(
            "/api/quotes",
            post(create_quote_handler)
                .route_layer(middleware::from_fn_with_state(limiter, rate_limit))
                .get(list_quotes_handler),
        )
        .route("/api/quotes/{id}", get(get_quote_handler))
        .route("/api/quotes/{id}/status", put(update_quote_status_handler))
        .with_state(service)
}

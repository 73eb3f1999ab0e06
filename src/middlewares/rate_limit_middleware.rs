use axum::http::{header, HeaderValue};
use axum::{body::Body, extract::State, http::Request, middleware::Next, response::{IntoResponse, Response}};
use std::sync::Arc;
use tracing::warn;

use crate::middlewares::client_context::ClientContext;
use crate::util::error::{HandlerError, ServiceError};
use crate::util::rate_limiter::RateLimiter;

pub const RATE_LIMIT_MESSAGE: &str =
    "Too many quote requests from this IP, please try again later.";

/// Reject the request with 429 once the client's quota for the current window is spent.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let client = ClientContext::from_request(req.headers(), req.extensions());
    let key = client.rate_limit_key();

    match limiter.try_acquire(key).await {
        Ok(()) => next.run(req).await,
        Err(retry_after) => {
            warn!(client = key, path = %req.uri().path(), "Quote submission rate limited");
            let err = ServiceError::RateLimited(RATE_LIMIT_MESSAGE.to_string());
            let mut response = HandlerError::from(err).into_response();
            // Round up so clients never retry a moment too early.
            let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

pub mod client_context;
pub mod rate_limit_middleware;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{header, request::Parts, Extensions, HeaderMap};
use std::convert::Infallible;
use std::net::SocketAddr;

/// Whether `X-Forwarded-For` may be believed. Installed as a request extension by the app.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProxyPolicy {
    pub trust_proxy: bool,
}

/// Who sent the request, as far as the server can tell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientContext {
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
}

impl ClientContext {
    pub const UNKNOWN_CLIENT: &'static str = "unknown";

    pub fn from_request(headers: &HeaderMap, extensions: &Extensions) -> Self {
        let trust_proxy = extensions
            .get::<ProxyPolicy>()
            .map(|policy| policy.trust_proxy)
            .unwrap_or(false);

        let forwarded = if trust_proxy {
            headers
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        } else {
            None
        };

        let ip_address = forwarded.or_else(|| {
            extensions
                .get::<ConnectInfo<SocketAddr>>()
                .map(|ConnectInfo(addr)| addr.ip().to_string())
        });

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        ClientContext { ip_address, user_agent }
    }

    /// Key used for per-client throttling.
    pub fn rate_limit_key(&self) -> &str {
        self.ip_address.as_deref().unwrap_or(Self::UNKNOWN_CLIENT)
    }
}

impl<S> FromRequestParts<S> for ClientContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientContext::from_request(&parts.headers, &parts.extensions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(forwarded: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_str(forwarded).unwrap());
        headers.insert(header::USER_AGENT, HeaderValue::from_static("test-agent/1.0"));
        headers
    }

    #[test]
    fn test_forwarded_for_ignored_without_trust() {
        let mut extensions = Extensions::new();
        extensions.insert(ConnectInfo(SocketAddr::from(([192, 168, 1, 9], 40000))));
        let ctx = ClientContext::from_request(&headers("203.0.113.7"), &extensions);
        assert_eq!(ctx.ip_address.as_deref(), Some("192.168.1.9"));
        assert_eq!(ctx.user_agent.as_deref(), Some("test-agent/1.0"));
    }

    #[test]
    fn test_first_forwarded_address_wins_when_trusted() {
        let mut extensions = Extensions::new();
        extensions.insert(ProxyPolicy { trust_proxy: true });
        extensions.insert(ConnectInfo(SocketAddr::from(([10, 0, 0, 1], 40000))));
        let ctx = ClientContext::from_request(&headers("203.0.113.7, 10.0.0.1"), &extensions);
        assert_eq!(ctx.ip_address.as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn test_unknown_client_key() {
        let ctx = ClientContext::from_request(&HeaderMap::new(), &Extensions::new());
        assert_eq!(ctx.ip_address, None);
        assert_eq!(ctx.rate_limit_key(), "unknown");
    }
}

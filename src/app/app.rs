use axum::handler::HandlerWithoutStateExt;
use axum::{routing::get, Extension, Router};
use sqlx::sqlite::SqlitePool;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::config::{ConfigError, Settings};
use crate::handler::not_found_handler;
use crate::middlewares::client_context::ProxyPolicy;
use crate::repository::analytics_repo::SqliteAnalyticsRepository;
use crate::repository::database;
use crate::repository::quote_repo::SqliteQuoteRepository;
use crate::repository::repository_error::RepositoryError;
use crate::router::analytics_router::analytics_router;
use crate::router::dashboard_router::dashboard_router;
use crate::router::quote_router::quote_router;
use crate::service::analytics_service::AnalyticsServiceImpl;
use crate::service::dashboard_service::DashboardServiceImpl;
use crate::service::quote_service::QuoteServiceImpl;
use crate::util::rate_limiter::RateLimiter;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct App {
    settings: Settings,
    pool: SqlitePool,
    router: Router,
    pub quote_service: Arc<QuoteServiceImpl>,
    pub analytics_service: Arc<AnalyticsServiceImpl>,
    pub dashboard_service: Arc<DashboardServiceImpl>,
    pub rate_limiter: Arc<RateLimiter>,
}

impl App {
    /// Open the database (creating the schema if needed) and wire every service.
    pub async fn new(settings: Settings) -> Result<Self, StartupError> {
        let pool = database::open(&settings.database).await?;
        Ok(Self::with_pool(settings, pool))
    }

    /// Wire the application around an already prepared pool.
    pub fn with_pool(settings: Settings, pool: SqlitePool) -> Self {
        let quote_repo = Arc::new(SqliteQuoteRepository::new(pool.clone()));
        let analytics_repo = Arc::new(SqliteAnalyticsRepository::new(pool.clone()));

        let analytics_service = Arc::new(AnalyticsServiceImpl::new(analytics_repo));
        let quote_service = Arc::new(QuoteServiceImpl::new(
            quote_repo.clone(),
            analytics_service.clone(),
        ));
        let dashboard_service = Arc::new(DashboardServiceImpl::new(quote_repo));
        let rate_limiter = Arc::new(RateLimiter::from_config(&settings.rate_limit));

        let mut app = App {
            settings,
            pool,
            router: Router::new(),
            quote_service,
            analytics_service,
            dashboard_service,
            rate_limiter,
        };
        app.router = app.create_router();
        app
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn create_router(&self) -> Router {
        let api = Router::new()
            .merge(quote_router(self.quote_service.clone(), self.rate_limiter.clone()))
            .merge(analytics_router(self.analytics_service.clone()))
            .merge(dashboard_router(self.dashboard_service.clone()))
            .route("/health", get(|| async { "OK" }))
            .method_not_allowed_fallback(not_found_handler);

        let router = match &self.settings.app.static_dir {
            Some(dir) => {
                info!("Serving static site from {}", dir);
                api.route_service("/admin", ServeFile::new(Path::new(dir).join("admin.html")))
                    .fallback_service(
                        ServeDir::new(dir).not_found_service(not_found_handler.into_service()),
                    )
            }
            None => api.fallback(not_found_handler),
        };

        let trace_layer =
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version()
                )
            });

        router
            .layer(Extension(ProxyPolicy {
                trust_proxy: self.settings.app.trust_proxy,
            }))
            .layer(CorsLayer::permissive())
            .layer(trace_layer)
    }

    pub async fn start(self) -> Result<(), StartupError> {
        let host = self
            .settings
            .app
            .host
            .parse()
            .map_err(|_| StartupError::InvalidAddress(self.settings.app.host.clone()))?;
        let addr = SocketAddr::new(host, self.settings.app.port);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("🚀 Server running at http://{}", addr);
        info!("Admin dashboard: http://{}/admin", addr);

        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        self.pool.close().await;
        info!("Database connection closed.");
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutting down server...");
}

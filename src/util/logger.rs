use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_CONSOLE_FILTER: &str = "info,prs_quote_backend=debug,tower_http=info";

pub struct Logger {
    pub guards: Vec<tracing_appender::non_blocking::WorkerGuard>,
}

impl Logger {
    /// Console plus rolling files under `log_dir`. The returned guards must be kept alive.
    pub fn new(log_dir: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let guards = Self::setup_logging(log_dir)?;
        Ok(Logger { guards })
    }

    /// Console only, used when the log directory is unusable.
    pub fn console_only() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(Self::console_filter())
            .with_target(true)
            .with_thread_ids(true)
            .try_init();
    }

    fn console_filter() -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_CONSOLE_FILTER))
    }

    pub fn setup_logging(
        log_dir: &str,
    ) -> Result<Vec<tracing_appender::non_blocking::WorkerGuard>, Box<dyn std::error::Error>> {
        let error_dir = format!("{}/error", log_dir);
        let json_dir = format!("{}/json", log_dir);
        std::fs::create_dir_all(&error_dir)?;
        std::fs::create_dir_all(&json_dir)?;

        let file_log_level = std::env::var("FILE_LOG_LEVEL").unwrap_or_else(|_| "debug".to_string());
        let error_file_log_level =
            std::env::var("ERROR_FILE_LOG_LEVEL").unwrap_or_else(|_| "error".to_string());

        let general_file = rolling::daily(log_dir, "prs-quote-backend.log");
        let (non_blocking_general, general_guard) = non_blocking(general_file);

        let error_file = rolling::daily(&error_dir, "prs-quote-backend-error.log");
        let (non_blocking_error, error_guard) = non_blocking(error_file);

        let json_file = rolling::daily(&json_dir, "prs-quote-backend.json");
        let (non_blocking_json, json_guard) = non_blocking(json_file);

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(Self::console_filter()),
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_general)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .with(
                fmt::layer()
                    .with_writer(non_blocking_error)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&error_file_log_level)),
            )
            .with(
                fmt::layer()
                    .json()
                    .with_writer(non_blocking_json)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new(&file_log_level)),
            )
            .try_init()?;

        Ok(vec![general_guard, error_guard, json_guard])
    }
}

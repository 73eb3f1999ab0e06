use dotenv::dotenv;
use std::process::ExitCode;
use tracing::{error, info, warn};

use prs_quote_backend::app::app::App;
use prs_quote_backend::config::Settings;
use prs_quote_backend::util::logger::Logger;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv_result = dotenv();

    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());
    // Guards flush the file writers on drop; keep them until main returns.
    let _logger = match Logger::new(&log_dir) {
        Ok(logger) => Some(logger),
        Err(e) => {
            Logger::console_only();
            warn!("⚠️ File logging disabled ({}), logging to console only", e);
            None
        }
    };

    info!("🚀 Starting PRS quote backend");
    match dotenv_result {
        Ok(_) => info!("✅ Successfully loaded .env file"),
        Err(e) => warn!("⚠️ Failed to load .env file: {} (using system env vars)", e),
    }

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("❌ Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = match App::new(settings).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ Failed to initialise application: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match app.start().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ Server stopped with error: {}", e);
            ExitCode::FAILURE
        }
    }
}

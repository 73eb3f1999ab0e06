//! Creates the database file, tables and indexes, then exits.

use dotenv::dotenv;
use std::process::ExitCode;
use tracing::{error, info};

use prs_quote_backend::config::DatabaseConfig;
use prs_quote_backend::repository::database;
use prs_quote_backend::util::logger::Logger;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenv();
    Logger::console_only();

    let config = match DatabaseConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Invalid database configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match database::open(&config).await {
        Ok(pool) => {
            pool.close().await;
            info!("✅ Database initialised at {}", config.url);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("❌ Database setup failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

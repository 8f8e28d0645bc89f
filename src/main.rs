//! Libris Server — library circulation service.
//!
//! Main entry point that wires all crates together and starts the server.

use tracing_subscriber::{EnvFilter, fmt};

use libris_core::config::AppConfig;
use libris_core::error::AppError;
use libris_database::connection::create_pool;
use libris_database::migration::run_migrations;

#[tokio::main]
async fn main() {
    let env = std::env::var("LIBRIS_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);
    tracing::info!("Starting Libris v{} (env: {})", env!("CARGO_PKG_VERSION"), env);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

async fn run(config: AppConfig) -> Result<(), AppError> {
    let db_pool = create_pool(&config.database).await?;
    run_migrations(&db_pool).await?;

    libris_api::run_server(config, db_pool).await
}

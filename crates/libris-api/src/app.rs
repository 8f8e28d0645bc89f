//! Application builder — wires repositories, services, router, and
//! middleware into a runnable Axum app.

use std::sync::Arc;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use libris_core::config::AppConfig;
use libris_core::error::AppError;
use libris_database::repositories::{
    BookRepository, CopyRepository, LoanRepository, UserRepository,
};
use libris_service::circulation::CirculationService;
use libris_service::copies::CopyService;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Construct the shared application state from a config and pool.
pub fn build_state(config: AppConfig, db_pool: PgPool) -> AppState {
    let users = Arc::new(UserRepository::new(db_pool.clone()));
    let books = Arc::new(BookRepository::new(db_pool.clone()));
    let copies = Arc::new(CopyRepository::new(db_pool.clone()));
    let loans = Arc::new(LoanRepository::new(db_pool.clone()));

    let circulation = Arc::new(CirculationService::new(
        db_pool.clone(),
        Arc::clone(&copies),
        Arc::clone(&loans),
        Arc::clone(&users),
        config.circulation.clone(),
    ));
    let copy_service = Arc::new(CopyService::new(Arc::clone(&copies), Arc::clone(&books)));

    AppState {
        config: Arc::new(config),
        db_pool,
        users,
        books,
        copies,
        loans,
        circulation,
        copy_service,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Runs the Libris server with the given configuration and database pool.
pub async fn run_server(config: AppConfig, db_pool: PgPool) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = build_state(config, db_pool);
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("Libris server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received, starting graceful shutdown...");
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    tracing::info!("Libris server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

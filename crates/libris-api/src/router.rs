//! Route definitions for the Libris HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(loan_routes())
        .merge(copy_routes())
        .merge(health_routes());

    Router::new().nest("/api", api_routes).with_state(state)
}

/// Circulation endpoints: borrow, return, override, ledger reads.
fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(handlers::loan::borrow))
        .route("/loans", get(handlers::loan::list_loans))
        .route("/loans/my", get(handlers::loan::my_loans))
        .route("/loans/overdue", get(handlers::loan::list_overdue))
        .route("/loans/{id}", get(handlers::loan::get_loan))
        .route("/loans/{id}", put(handlers::loan::update_loan))
        .route("/loans/{id}/return", post(handlers::loan::return_loan))
}

/// Copy registry endpoints.
fn copy_routes() -> Router<AppState> {
    Router::new()
        .route("/copies", post(handlers::copy::create_copy))
        .route("/copies/{id}", get(handlers::copy::get_copy))
        .route("/copies/{id}", put(handlers::copy::update_copy))
        .route("/copies/{id}", delete(handlers::copy::delete_copy))
        .route("/copies/{id}/status", put(handlers::copy::set_copy_status))
        .route("/books/{id}/copies", get(handlers::copy::list_book_copies))
}

/// Health endpoints.
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}

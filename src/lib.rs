// Wallet ledger service
// Records wallet transactions and keeps the custodial balance in step with them

pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod store;
pub mod validation;

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use error::{LedgerError, StoreError};
pub use ledger::Ledger;

/// Preflight cache lifetime advertised to browsers.
const CORS_MAX_AGE: Duration = Duration::from_secs(86_400);

/// Application state shared across handlers
pub struct AppState {
    pub ledger: Ledger,
}

/// Build the HTTP router around a ledger.
pub fn app(ledger: Ledger) -> Router {
    let state = Arc::new(AppState { ledger });

    // Answers every OPTIONS request and stamps the allow-origin header on
    // everything else.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(CORS_MAX_AGE);

    Router::new()
        .route(
            "/",
            get(handlers::list_transactions)
                .post(handlers::record_transaction)
                .fallback(handlers::method_not_allowed),
        )
        .route("/health", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

// HTTP handlers for the ledger endpoints

use axum::{
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::LedgerError;
use crate::models::{LedgerView, Receipt, RecordRequest};
use crate::AppState;

/// `GET /` - recent transactions and the wallet balance
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LedgerView>, LedgerError> {
    let view = state.ledger.recent().await?;
    info!(
        "Listing {} transactions, balance {}",
        view.transactions.len(),
        view.balance
    );
    Ok(Json(view))
}

/// `POST /` - record a new transaction
pub async fn record_transaction(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Receipt>), LedgerError> {
    let request: RecordRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Rejecting malformed transaction body: {}", e);
        LedgerError::invalid("request body must be a JSON object with type, amount and address")
    })?;

    let receipt = state.ledger.record(request).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

/// Any verb on `/` other than GET and POST. OPTIONS never reaches this;
/// the CORS layer answers it.
pub async fn method_not_allowed(method: Method) -> LedgerError {
    warn!("Unsupported method {}", method);
    LedgerError::MethodNotAllowed
}

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let db_health = state.ledger.store().ping().await.is_ok();

    let (status, label) = if db_health {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(json!({
            "status": label,
            "database": if db_health { "up" } else { "down" },
        })),
    )
}

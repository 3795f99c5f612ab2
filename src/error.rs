// Error types for the ledger service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bigdecimal::BigDecimal;
use serde_json::json;
use tracing::error;

/// Failures coming out of a data store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Request-level failures. Each one maps to a non-2xx response with a JSON
/// `error` field.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
    #[error("{0}")]
    InvalidInput(String),
    #[error("insufficient funds: balance {available}, requested {requested}")]
    InsufficientFunds {
        available: BigDecimal,
        requested: BigDecimal,
    },
    #[error("wallet {0} not found")]
    WalletNotFound(i64),
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl LedgerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        LedgerError::InvalidInput(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::StoreUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            LedgerError::InsufficientFunds { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::WalletNotFound(_) => StatusCode::CONFLICT,
            LedgerError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let message = match &self {
            // Driver details stay in the log.
            LedgerError::StoreUnavailable(e) => {
                error!("Store failure: {}", e);
                "Store unavailable".to_string()
            }
            other => other.to_string(),
        };
        let body = Json(json!({
            "error": message,
        }));
        (self.status_code(), body).into_response()
    }
}

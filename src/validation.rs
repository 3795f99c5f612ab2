// Input validation for new ledger entries

use bigdecimal::{num_bigint::BigInt, BigDecimal};
use serde_json::Value;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{NewTransaction, RecordRequest};

/// Fractional digits the `amount` columns keep.
pub const AMOUNT_SCALE: i64 = 9;

/// Integer digits the `amount` columns keep (NUMERIC(30, 9)).
const AMOUNT_INTEGER_DIGITS: i64 = 21;

/// Rules a write must satisfy before anything touches the store
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerPolicy {
    /// Accepted values of `type`
    pub transaction_types: Vec<String>,
    /// Let a debit take the balance below zero. When false, a send with a
    /// positive amount must leave the balance at zero or above; a zero-amount
    /// send is always accepted.
    pub allow_overdraft: bool,
}

impl Default for LedgerPolicy {
    fn default() -> Self {
        Self {
            transaction_types: vec!["sent".to_string(), "received".to_string()],
            allow_overdraft: false,
        }
    }
}

impl LedgerPolicy {
    /// Turn a raw request into a transaction that is safe to write.
    pub fn validate(&self, request: RecordRequest) -> Result<NewTransaction, LedgerError> {
        let transaction_type = request
            .transaction_type
            .ok_or_else(|| LedgerError::invalid("type is required"))?;
        if !self.transaction_types.iter().any(|t| *t == transaction_type) {
            return Err(LedgerError::invalid(format!(
                "unsupported transaction type '{}', expected one of: {}",
                transaction_type,
                self.transaction_types.join(", ")
            )));
        }

        let amount = request
            .amount
            .as_ref()
            .ok_or_else(|| LedgerError::invalid("amount is required"))
            .and_then(parse_amount)?;

        let address = request
            .address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .ok_or_else(|| LedgerError::invalid("address is required"))?;

        Ok(NewTransaction {
            transaction_type,
            amount,
            address,
        })
    }
}

/// Accept a JSON number or a numeric string; reject anything negative or
/// finer than the column scale.
pub fn parse_amount(value: &Value) -> Result<BigDecimal, LedgerError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => return Err(LedgerError::invalid("amount must be a number")),
    };

    let amount = BigDecimal::from_str(&text)
        .map_err(|_| LedgerError::invalid(format!("amount '{}' is not a number", text)))?;

    if amount < BigDecimal::from(0) {
        return Err(LedgerError::invalid("amount must not be negative"));
    }

    let (_, scale) = amount.normalized().as_bigint_and_exponent();
    if scale > AMOUNT_SCALE {
        return Err(LedgerError::invalid(format!(
            "amount supports at most {} decimal places",
            AMOUNT_SCALE
        )));
    }

    if amount >= BigDecimal::new(BigInt::from(1), -AMOUNT_INTEGER_DIGITS) {
        return Err(LedgerError::invalid("amount is too large"));
    }

    Ok(amount)
}

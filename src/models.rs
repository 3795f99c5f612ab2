// Ledger models shared by the store, the ledger and the HTTP layer

use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, Utc};
use serde::{ser::Error as _, Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Status every new transaction is recorded with. Nothing moves a
/// transaction out of it yet.
pub const PENDING_STATUS: &str = "pending";

/// The only transaction type that touches the wallet balance.
pub const SENT_TYPE: &str = "sent";

/// Transaction row as stored in `transactions`
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Transaction {
    pub id: i64,
    pub transaction_type: String,
    #[serde(serialize_with = "as_number")]
    pub amount: BigDecimal,
    pub address: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// A validated transaction waiting to be written
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub transaction_type: String,
    pub amount: BigDecimal,
    pub address: String,
}

impl NewTransaction {
    /// Whether recording this transaction debits the wallet.
    pub fn is_debit(&self) -> bool {
        self.transaction_type == SENT_TYPE
    }
}

/// Raw body of `POST /`. Every field is optional here so validation can
/// report exactly what is wrong instead of a generic decode failure.
#[derive(Debug, Default, Deserialize)]
pub struct RecordRequest {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: Option<Value>,
    pub address: Option<String>,
}

/// What a store returns for the listing: recent rows plus the wallet
/// balance, `None` when the wallet row does not exist.
#[derive(Debug, Clone, Default)]
pub struct StoreSnapshot {
    pub transactions: Vec<Transaction>,
    pub balance: Option<BigDecimal>,
}

/// Response for `GET /`
#[derive(Debug, Serialize)]
pub struct LedgerView {
    pub transactions: Vec<Transaction>,
    #[serde(serialize_with = "as_number")]
    pub balance: BigDecimal,
}

/// Response for `POST /`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub id: i64,
    pub status: &'static str,
}

/// Decimal quantities go out as plain JSON numbers. The conversion goes
/// through `f64`, so only about 15 significant digits survive; the stored
/// NUMERIC value stays exact.
fn as_number<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
    match value.to_f64() {
        Some(number) if number.is_finite() => serializer.serialize_f64(number),
        _ => Err(S::Error::custom(format!("{value} is not representable as a JSON number"))),
    }
}

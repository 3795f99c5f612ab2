// Data-store seam between the ledger and its persistence

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::error::StoreResult;
use crate::models::{NewTransaction, StoreSnapshot};

/// Persistent home of the `transactions` and `wallets` tables.
///
/// Every call acquires what it needs from the backing store and releases it
/// before returning; nothing is held between requests.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Newest `limit` transactions by `created_at`, plus the balance of
    /// `wallet_id` if that row exists. Both reads share one connection.
    async fn snapshot(&self, wallet_id: i64, limit: i64) -> StoreResult<StoreSnapshot>;

    /// Open a unit of work. Dropping it without `commit` discards every
    /// write made through it.
    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>>;

    /// Cheap round trip used by the health endpoint.
    async fn ping(&self) -> StoreResult<()>;
}

/// Writes that commit or abort together
#[async_trait]
pub trait UnitOfWork: Send {
    /// Insert a `pending` transaction and return its id.
    async fn insert_transaction(&mut self, entry: &NewTransaction) -> StoreResult<i64>;

    /// Subtract `amount` from the wallet and return the new balance, or
    /// `None` if there is no such wallet. Holds the wallet row until the
    /// unit ends.
    async fn debit_wallet(
        &mut self,
        wallet_id: i64,
        amount: &BigDecimal,
    ) -> StoreResult<Option<BigDecimal>>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

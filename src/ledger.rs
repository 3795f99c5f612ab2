// Ledger reader and writer
//
// The wallet balance is a running total kept next to the transaction log.
// A debit and the row that explains it are written in one unit of work so
// the two never drift apart.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::LedgerError;
use crate::models::{LedgerView, Receipt, RecordRequest, PENDING_STATUS};
use crate::store::LedgerStore;
use crate::validation::LedgerPolicy;

/// Number of transactions the listing returns.
pub const RECENT_WINDOW: i64 = 20;

#[derive(Clone)]
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    wallet_id: i64,
    policy: LedgerPolicy,
}

impl Ledger {
    pub fn new(store: Arc<dyn LedgerStore>, wallet_id: i64, policy: LedgerPolicy) -> Self {
        Self {
            store,
            wallet_id,
            policy,
        }
    }

    pub fn store(&self) -> &Arc<dyn LedgerStore> {
        &self.store
    }

    /// Newest transactions first plus the current balance. A wallet that
    /// has not been seeded reads as a zero balance.
    pub async fn recent(&self) -> Result<LedgerView, LedgerError> {
        let snapshot = self.store.snapshot(self.wallet_id, RECENT_WINDOW).await?;

        let mut transactions = snapshot.transactions;
        transactions.truncate(RECENT_WINDOW as usize);

        let balance = snapshot.balance.unwrap_or_else(|| {
            debug!("Wallet {} has no row, reporting zero balance", self.wallet_id);
            BigDecimal::from(0)
        });

        Ok(LedgerView {
            transactions,
            balance,
        })
    }

    /// Validate and record a transaction. A `sent` transaction debits the
    /// wallet in the same unit of work as the insert.
    pub async fn record(&self, request: RecordRequest) -> Result<Receipt, LedgerError> {
        let entry = self.policy.validate(request)?;

        let mut unit = self.store.begin().await?;
        let id = unit.insert_transaction(&entry).await?;

        if entry.is_debit() {
            match unit.debit_wallet(self.wallet_id, &entry.amount).await? {
                None => {
                    warn!(
                        "Rejecting sent transaction: wallet {} does not exist",
                        self.wallet_id
                    );
                    unit.rollback().await?;
                    return Err(LedgerError::WalletNotFound(self.wallet_id));
                }
                // A zero-amount send never makes an already negative balance worse.
                Some(balance)
                    if balance < BigDecimal::from(0)
                        && entry.amount > BigDecimal::from(0)
                        && !self.policy.allow_overdraft =>
                {
                    let available = &balance + &entry.amount;
                    warn!(
                        "Rejecting sent transaction of {}: wallet {} holds {}",
                        entry.amount, self.wallet_id, available
                    );
                    unit.rollback().await?;
                    return Err(LedgerError::InsufficientFunds {
                        available,
                        requested: entry.amount,
                    });
                }
                Some(balance) => {
                    debug!("Wallet {} balance now {}", self.wallet_id, balance);
                }
            }
        }

        unit.commit().await?;

        info!(
            "Recorded {} transaction {} of {} to {}",
            entry.transaction_type, id, entry.amount, entry.address
        );

        Ok(Receipt {
            id,
            status: PENDING_STATUS,
        })
    }
}

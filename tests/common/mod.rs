// In-memory ledger store used by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{Mutex, OwnedMutexGuard};
use wallet_ledger::error::{StoreError, StoreResult};
use wallet_ledger::models::{NewTransaction, StoreSnapshot, Transaction, PENDING_STATUS};
use wallet_ledger::store::{LedgerStore, UnitOfWork};
use wallet_ledger::validation::LedgerPolicy;
use wallet_ledger::Ledger;

/// Where an injected failure fires
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Snapshot,
    Begin,
    Insert,
    Debit,
    Commit,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub transactions: Vec<Transaction>,
    pub wallets: BTreeMap<i64, BigDecimal>,
    next_id: i64,
}

impl MemoryState {
    fn clock(&self, id: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(id)
    }
}

/// Whole-store lock per unit of work, the same serialization the wallet row
/// lock gives in Postgres. Writes are staged and only land on commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
    fail_at: Arc<StdMutex<Option<FailPoint>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn with_wallet(wallet_id: i64, balance: &str) -> Self {
        let store = Self::new();
        store.set_wallet(wallet_id, balance).await;
        store
    }

    pub async fn set_wallet(&self, wallet_id: i64, balance: &str) {
        self.state
            .lock()
            .await
            .wallets
            .insert(wallet_id, dec(balance));
    }

    /// Add a committed row directly, bypassing the ledger.
    pub async fn seed_transaction(&self, transaction_type: &str, amount: &str, address: &str) {
        let mut state = self.state.lock().await;
        state.next_id += 1;
        let id = state.next_id;
        let created_at = state.clock(id);
        state.transactions.push(Transaction {
            id,
            transaction_type: transaction_type.to_string(),
            amount: dec(amount),
            address: address.to_string(),
            status: PENDING_STATUS.to_string(),
            created_at,
        });
    }

    pub fn fail_at(&self, point: FailPoint) {
        *self.fail_at.lock().unwrap() = Some(point);
    }

    pub fn heal(&self) {
        *self.fail_at.lock().unwrap() = None;
    }

    pub async fn state(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    pub async fn balance(&self, wallet_id: i64) -> Option<BigDecimal> {
        self.state.lock().await.wallets.get(&wallet_id).cloned()
    }

    pub async fn transaction_count(&self) -> usize {
        self.state.lock().await.transactions.len()
    }

    fn check(&self, point: FailPoint) -> StoreResult<()> {
        check(&self.fail_at, point)
    }
}

fn check(fail_at: &StdMutex<Option<FailPoint>>, point: FailPoint) -> StoreResult<()> {
    if *fail_at.lock().unwrap() == Some(point) {
        return Err(StoreError::Unavailable(format!("injected failure at {:?}", point)));
    }
    Ok(())
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn snapshot(&self, wallet_id: i64, limit: i64) -> StoreResult<StoreSnapshot> {
        self.check(FailPoint::Snapshot)?;
        let state = self.state.lock().await;

        let mut transactions = state.transactions.clone();
        transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        transactions.truncate(limit as usize);

        Ok(StoreSnapshot {
            transactions,
            balance: state.wallets.get(&wallet_id).cloned(),
        })
    }

    async fn begin(&self) -> StoreResult<Box<dyn UnitOfWork>> {
        self.check(FailPoint::Begin)?;
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnit {
            guard,
            staged,
            fail_at: self.fail_at.clone(),
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check(FailPoint::Snapshot)
    }
}

pub struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_at: Arc<StdMutex<Option<FailPoint>>>,
}

#[async_trait]
impl UnitOfWork for MemoryUnit {
    async fn insert_transaction(&mut self, entry: &NewTransaction) -> StoreResult<i64> {
        check(&self.fail_at, FailPoint::Insert)?;
        self.staged.next_id += 1;
        let id = self.staged.next_id;
        let created_at = self.staged.clock(id);
        self.staged.transactions.push(Transaction {
            id,
            transaction_type: entry.transaction_type.clone(),
            amount: entry.amount.clone(),
            address: entry.address.clone(),
            status: PENDING_STATUS.to_string(),
            created_at,
        });
        Ok(id)
    }

    async fn debit_wallet(
        &mut self,
        wallet_id: i64,
        amount: &BigDecimal,
    ) -> StoreResult<Option<BigDecimal>> {
        check(&self.fail_at, FailPoint::Debit)?;
        Ok(self.staged.wallets.get_mut(&wallet_id).map(|balance| {
            *balance = &*balance - amount;
            balance.clone()
        }))
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        check(&self.fail_at, FailPoint::Commit)?;
        let MemoryUnit {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}

pub fn dec(value: &str) -> BigDecimal {
    BigDecimal::from_str(value).unwrap()
}

pub fn ledger(store: &MemoryStore, wallet_id: i64) -> Ledger {
    Ledger::new(Arc::new(store.clone()), wallet_id, LedgerPolicy::default())
}

pub fn ledger_with(store: &MemoryStore, wallet_id: i64, policy: LedgerPolicy) -> Ledger {
    Ledger::new(Arc::new(store.clone()), wallet_id, policy)
}

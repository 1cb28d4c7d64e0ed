//! Single-writer handle for multi-threaded hosts
//!
//! [`AccountingEngine`] mutates and then validates; the pair is only atomic
//! if no other writer runs in between. [`SharedEngine`] serializes every call
//! through one lock.

use crate::{
    transaction::Metadata, AccountSummary, AccountingEngine, Balance, Money, Party, Result,
    Transaction,
};
use chrono::NaiveDate;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Cloneable, lock-protected engine handle
#[derive(Debug, Clone, Default)]
pub struct SharedEngine {
    inner: Arc<Mutex<AccountingEngine>>,
}

impl SharedEngine {
    /// Wrap an engine
    pub fn new(engine: AccountingEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// See [`AccountingEngine::post_expense`]
    pub fn post_expense(
        &self,
        date: NaiveDate,
        payer: Party,
        ryan_share: impl Into<Money>,
        jordyn_share: impl Into<Money>,
        description: impl Into<String>,
        metadata: Option<Metadata>,
    ) -> Result<Uuid> {
        self.inner
            .lock()
            .post_expense(date, payer, ryan_share, jordyn_share, description, metadata)
    }

    /// See [`AccountingEngine::post_rent`]
    pub fn post_rent(
        &self,
        date: NaiveDate,
        total_rent: impl Into<Money>,
        ryan_percentage: Decimal,
    ) -> Result<Uuid> {
        self.inner.lock().post_rent(date, total_rent, ryan_percentage)
    }

    /// See [`AccountingEngine::post_settlement`]
    pub fn post_settlement(
        &self,
        date: NaiveDate,
        amount: impl Into<Money>,
        from_person: Party,
        to_person: Party,
    ) -> Result<Uuid> {
        self.inner
            .lock()
            .post_settlement(date, amount, from_person, to_person)
    }

    /// See [`AccountingEngine::get_current_balance`]
    pub fn get_current_balance(&self) -> Result<Balance> {
        self.inner.lock().get_current_balance()
    }

    /// See [`AccountingEngine::get_account_summary`]
    pub fn get_account_summary(&self) -> Result<AccountSummary> {
        self.inner.lock().get_account_summary()
    }

    /// Copy of the entry log
    pub fn transaction_log(&self) -> Vec<Transaction> {
        self.inner.lock().get_transaction_log().to_vec()
    }

    /// See [`AccountingEngine::export_audit_trail`]
    pub fn export_audit_trail(&self, destination: impl AsRef<Path>) -> Result<()> {
        self.inner.lock().export_audit_trail(destination)
    }

    /// Run a closure with exclusive access to the engine
    pub fn with_engine<T>(&self, f: impl FnOnce(&mut AccountingEngine) -> T) -> T {
        f(&mut self.inner.lock())
    }

    /// Take the engine back if this is the last handle
    pub fn try_into_inner(self) -> std::result::Result<AccountingEngine, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

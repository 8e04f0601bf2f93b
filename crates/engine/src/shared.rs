//! Thread-safe handle to a [`LedgerEngine`].
//!
//! Every method takes the lock once and runs the whole operation inside it.
//! Sell in particular is check-select-remove-log; interleaving any of those
//! steps with another caller could oversell.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;

use larder_core::{Clock, DomainError, DomainResult, Money, SystemClock};
use larder_ledger::TransactionRecord;

use crate::engine::LedgerEngine;
use crate::summary::{ReceiveSummary, SaleSummary, StockReport, SweepSummary};

#[derive(Debug)]
pub struct SharedLedgerEngine<C: Clock = SystemClock> {
    inner: Arc<Mutex<LedgerEngine<C>>>,
}

impl<C: Clock> Clone for SharedLedgerEngine<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: Clock> SharedLedgerEngine<C> {
    pub fn new(engine: LedgerEngine<C>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> DomainResult<MutexGuard<'_, LedgerEngine<C>>> {
        self.inner
            .lock()
            .map_err(|_| DomainError::unavailable("ledger engine lock poisoned"))
    }

    /// Run a read-only closure against a consistent snapshot of the engine.
    pub fn read<R>(&self, f: impl FnOnce(&LedgerEngine<C>) -> R) -> DomainResult<R> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    pub fn check_stock(&self) -> DomainResult<StockReport> {
        self.read(LedgerEngine::check_stock)
    }

    pub fn cash_balance(&self) -> DomainResult<Money> {
        self.read(LedgerEngine::cash_balance)
    }

    pub fn sales_revenue(&self) -> DomainResult<Money> {
        self.read(LedgerEngine::sales_revenue)
    }

    /// Copy of the log in insertion order.
    pub fn list_transactions(&self) -> DomainResult<Vec<TransactionRecord>> {
        self.read(|engine| engine.list_transactions().to_vec())
    }

    pub fn receive(
        &self,
        delivery_price: Money,
        quantity: u32,
        expiry_date: NaiveDate,
    ) -> DomainResult<ReceiveSummary> {
        self.lock()?.receive(delivery_price, quantity, expiry_date)
    }

    pub fn sell(&self, quantity: u32) -> DomainResult<SaleSummary> {
        self.lock()?.sell(quantity)
    }

    pub fn sweep_expired(&self) -> DomainResult<SweepSummary> {
        self.lock()?.sweep_expired()
    }
}

//! Results handed back to callers of the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use larder_core::Money;
use larder_ledger::TransactionRecord;

/// Basket counts at a point in time.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    pub total: usize,
    /// Baskets whose expiry date is strictly before today.
    pub expired: usize,
}

impl StockReport {
    pub fn fresh(&self) -> usize {
        self.total - self.expired
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiveSummary {
    pub quantity: u32,
    pub unit_cost: Money,
    pub unit_sale_price: Money,
    pub expiry_date: NaiveDate,
    /// The delivery was already past its expiry date when it arrived.
    /// Accepted, but worth a warning to whoever entered it.
    pub expired_on_arrival: bool,
    pub record: TransactionRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleSummary {
    pub quantity: u32,
    pub sale_value: Money,
    pub record: TransactionRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepSummary {
    /// No basket was past its expiry date; nothing was logged.
    NothingToRemove,
    Discarded {
        quantity: u32,
        lost_value: Money,
        record: TransactionRecord,
    },
}

impl SweepSummary {
    pub fn discarded_quantity(&self) -> u32 {
        match self {
            SweepSummary::NothingToRemove => 0,
            SweepSummary::Discarded { quantity, .. } => *quantity,
        }
    }
}

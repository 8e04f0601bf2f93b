//! `larder-engine`: the inventory and cash-ledger service.
//!
//! [`LedgerEngine`] owns the basket stock and the transaction log and is the
//! only way to mutate either. Every command is validated in full before any
//! state changes, and each successful receive, sale or non-empty sweep appends
//! exactly one transaction record.

pub mod config;
pub mod engine;
pub mod shared;
pub mod summary;

pub use config::{EngineConfig, MARKUP_RATE_ENV};
pub use engine::LedgerEngine;
pub use shared::SharedLedgerEngine;
pub use summary::{ReceiveSummary, SaleSummary, StockReport, SweepSummary};

pub use larder_core::{Clock, DomainError as EngineError, DomainResult, ManualClock, Money, SystemClock};
pub use larder_inventory::Basket;
pub use larder_ledger::{TransactionKind, TransactionLog, TransactionRecord};

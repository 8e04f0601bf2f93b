//! Cash ledger (append-only transaction log).
//!
//! Pure domain logic only: the log is a projection over warehouse events and
//! every cash figure is derived from it.

pub mod log;
pub mod record;

pub use log::TransactionLog;
pub use record::{TransactionKind, TransactionRecord};

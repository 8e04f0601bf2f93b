use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larder_core::{Money, TransactionId};

/// What kind of money-affecting event a record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Receive,
    Sale,
    Discard,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Receive => "RECEIVE",
            TransactionKind::Sale => "SALE",
            TransactionKind::Discard => "DISCARD",
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log entry.
///
/// `amount` is the impact on the cash position: negative for deliveries paid
/// and stock written off, positive for sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    /// 1-based position in the log.
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub kind: TransactionKind,
    pub quantity: u32,
    pub amount: Money,
}

impl core::fmt::Display for TransactionRecord {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "[{}] - {}: {} baskets, amount: {}",
            self.timestamp.format("%d/%m/%Y %H:%M:%S"),
            self.kind,
            self.quantity,
            self.amount
        )
    }
}

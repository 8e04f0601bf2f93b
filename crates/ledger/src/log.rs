use larder_core::{DomainError, DomainResult, Money, TransactionId};
use larder_events::{Event, EventEnvelope, Projection};
use larder_inventory::WarehouseEvent;

use crate::record::{TransactionKind, TransactionRecord};

/// Running totals, kept alongside the records so reads never re-add the log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct Totals {
    balance: Money,
    receive: Money,
    sale: Money,
    discard: Money,
}

impl Totals {
    fn of(&self, kind: TransactionKind) -> Money {
        match kind {
            TransactionKind::Receive => self.receive,
            TransactionKind::Sale => self.sale,
            TransactionKind::Discard => self.discard,
        }
    }

    /// Totals after one more entry, `None` if any of them would overflow.
    fn with(&self, kind: TransactionKind, amount: Money) -> Option<Totals> {
        let mut next = *self;
        next.balance = self.balance.checked_add(amount)?;
        let slot = match kind {
            TransactionKind::Receive => &mut next.receive,
            TransactionKind::Sale => &mut next.sale,
            TransactionKind::Discard => &mut next.discard,
        };
        *slot = slot.checked_add(amount)?;
        Some(next)
    }
}

/// Append-only transaction log.
///
/// Built by projecting warehouse events: each envelope becomes exactly one
/// record. Envelopes at or below the last applied sequence number are ignored,
/// so replaying a stream twice does not duplicate entries.
///
/// Callers check [`TransactionLog::admit`] before mutating anything else. An
/// envelope whose amount would overflow the running totals is not recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
    last_sequence: u64,
    totals: Totals,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }

    pub fn last_sequence(&self) -> u64 {
        self.last_sequence
    }

    /// Net cash position: the sum of every amount in the log.
    ///
    /// Deliveries count against it, so it differs from [`Self::sales_revenue`]
    /// by the receive and discard totals.
    pub fn cash_balance(&self) -> Money {
        self.totals.balance
    }

    /// Sum of amounts for one kind of transaction.
    pub fn total_for(&self, kind: TransactionKind) -> Money {
        self.totals.of(kind)
    }

    /// Money taken at the till (sales only).
    pub fn sales_revenue(&self) -> Money {
        self.total_for(TransactionKind::Sale)
    }

    /// Check that `events` can be recorded without overflowing any total.
    pub fn admit<'a, I>(&self, events: I) -> DomainResult<()>
    where
        I: IntoIterator<Item = &'a WarehouseEvent>,
    {
        events.into_iter().try_fold(self.totals, |totals, event| {
            let (kind, amount) = to_entry(event);
            totals.with(kind, amount).ok_or_else(|| {
                DomainError::arithmetic(format!("{kind} of {amount} overflows the cash totals"))
            })
        })?;
        Ok(())
    }

    /// Records ordered most-recent-first (timestamp, then sequence, descending).
    pub fn recent_first(&self) -> impl Iterator<Item = &TransactionRecord> {
        let mut ordered: Vec<&TransactionRecord> = self.records.iter().collect();
        ordered.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| b.sequence.cmp(&a.sequence))
        });
        ordered.into_iter()
    }
}

fn to_entry(event: &WarehouseEvent) -> (TransactionKind, Money) {
    match event {
        WarehouseEvent::DeliveryReceived(e) => (TransactionKind::Receive, -e.delivery_price),
        WarehouseEvent::BasketsSold(e) => (TransactionKind::Sale, e.sale_value),
        WarehouseEvent::ExpiredDiscarded(e) => (TransactionKind::Discard, -e.lost_value),
    }
}

impl Projection for TransactionLog {
    type Ev = WarehouseEvent;

    fn apply(&mut self, envelope: &EventEnvelope<Self::Ev>) {
        let seq = envelope.sequence_number();
        if seq <= self.last_sequence {
            // Duplicate or replay; safe to ignore.
            return;
        }

        let event = envelope.payload();
        let (kind, amount) = to_entry(event);
        let Some(totals) = self.totals.with(kind, amount) else {
            return;
        };
        self.totals = totals;
        self.records.push(TransactionRecord {
            id: TransactionId::from_uuid(envelope.event_id()),
            sequence: seq,
            timestamp: event.occurred_at(),
            kind,
            quantity: event.quantity(),
            amount,
        });
        self.last_sequence = seq;
    }
}

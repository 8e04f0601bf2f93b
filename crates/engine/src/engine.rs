//! The ledger engine: command pipeline over the warehouse and transaction log.
//!
//! ```text
//! public method
//!   ↓
//! 1. Build a command stamped with the clock's time/date
//!   ↓
//! 2. Warehouse::handle (pure validation + decision, produces events)
//!   ↓
//! 3. TransactionLog::admit (the cash totals can absorb the events)
//!   ↓
//! 4. Wrap each event in a sequenced envelope
//!   ↓
//! 5. Apply to the warehouse, then project into the transaction log
//! ```
//!
//! A rejected command stops at step 2 or 3, so nothing is mutated and nothing is
//! logged.

use chrono::NaiveDate;

use larder_core::{Aggregate, Clock, DomainError, DomainResult, Money, SystemClock};
use larder_events::{EventEnvelope, Projection};
use larder_inventory::{
    Basket, DiscardExpired, ReceiveDelivery, SellBaskets, Warehouse, WarehouseCommand,
    WarehouseEvent, WarehouseId,
};
use larder_ledger::{TransactionLog, TransactionRecord};

use crate::config::EngineConfig;
use crate::summary::{ReceiveSummary, SaleSummary, StockReport, SweepSummary};

/// Owns the basket stock, the transaction log and the clock.
///
/// Cash is never stored separately; it is always derived from the log.
#[derive(Debug)]
pub struct LedgerEngine<C: Clock = SystemClock> {
    warehouse: Warehouse,
    log: TransactionLog,
    clock: C,
    sequence: u64,
}

impl LedgerEngine<SystemClock> {
    /// Engine with default pricing on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for LedgerEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> LedgerEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            warehouse: Warehouse::empty(WarehouseId::new(), Default::default()),
            log: TransactionLog::new(),
            clock,
            sequence: 0,
        }
    }

    pub fn with_config(config: &EngineConfig, clock: C) -> DomainResult<Self> {
        let pricing = config.pricing()?;
        Ok(Self {
            warehouse: Warehouse::empty(WarehouseId::new(), pricing),
            log: TransactionLog::new(),
            clock,
            sequence: 0,
        })
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Total baskets and how many of them are past their expiry date.
    pub fn check_stock(&self) -> StockReport {
        StockReport {
            total: self.warehouse.len(),
            expired: self.warehouse.count_expired(self.clock.today()),
        }
    }

    /// Baskets in receipt order.
    pub fn stock(&self) -> &[Basket] {
        self.warehouse.baskets()
    }

    /// Net cash position: the rounded sum of every logged amount.
    ///
    /// Deliveries are paid out of it, so after receiving for 100.00 and selling
    /// for 48.00 it reads -52.00. Use [`Self::sales_revenue`] for the takings.
    pub fn cash_balance(&self) -> Money {
        self.log.cash_balance()
    }

    /// Money taken from sales alone.
    pub fn sales_revenue(&self) -> Money {
        self.log.sales_revenue()
    }

    /// Log entries in insertion order.
    pub fn list_transactions(&self) -> &[TransactionRecord] {
        self.log.records()
    }

    pub fn transaction_log(&self) -> &TransactionLog {
        &self.log
    }

    /// Take in a delivery of `quantity` baskets that cost `delivery_price` in total.
    ///
    /// Expiry dates in the past are accepted and flagged in the summary.
    pub fn receive(
        &mut self,
        delivery_price: Money,
        quantity: u32,
        expiry_date: NaiveDate,
    ) -> DomainResult<ReceiveSummary> {
        let cmd = WarehouseCommand::ReceiveDelivery(ReceiveDelivery {
            delivery_price,
            quantity,
            expiry_date,
            occurred_at: self.clock.now(),
        });

        let (event, record) = self.execute_one(cmd, "receive")?;
        let e = match event {
            WarehouseEvent::DeliveryReceived(e) => e,
            other => return Err(unexpected("receive", &other)),
        };

        let expired_on_arrival = e.expiry_date < self.clock.today();
        if expired_on_arrival {
            tracing::warn!(
                expiry_date = %e.expiry_date,
                quantity = e.quantity,
                "delivery received already past its expiry date"
            );
        }
        tracing::info!(
            quantity = e.quantity,
            delivery_price = %e.delivery_price,
            unit_sale_price = %e.unit_sale_price,
            expiry_date = %e.expiry_date,
            "delivery received"
        );

        Ok(ReceiveSummary {
            quantity: e.quantity,
            unit_cost: e.unit_cost,
            unit_sale_price: e.unit_sale_price,
            expiry_date: e.expiry_date,
            expired_on_arrival,
            record,
        })
    }

    /// Sell `quantity` baskets, cheapest first. All or nothing.
    pub fn sell(&mut self, quantity: u32) -> DomainResult<SaleSummary> {
        let cmd = WarehouseCommand::SellBaskets(SellBaskets {
            quantity,
            occurred_at: self.clock.now(),
        });

        let (event, record) = self.execute_one(cmd, "sell")?;
        let e = match event {
            WarehouseEvent::BasketsSold(e) => e,
            other => return Err(unexpected("sell", &other)),
        };

        tracing::info!(quantity, sale_value = %e.sale_value, "baskets sold");

        Ok(SaleSummary {
            quantity: record.quantity,
            sale_value: e.sale_value,
            record,
        })
    }

    /// Remove every basket whose expiry date is before today.
    pub fn sweep_expired(&mut self) -> DomainResult<SweepSummary> {
        let today = self.clock.today();
        let cmd = WarehouseCommand::DiscardExpired(DiscardExpired {
            today,
            occurred_at: self.clock.now(),
        });

        let mut applied = self.execute(cmd, "sweep")?;
        let Some((event, record)) = applied.pop() else {
            tracing::debug!(%today, "no expired baskets to remove");
            return Ok(SweepSummary::NothingToRemove);
        };
        if !applied.is_empty() {
            return Err(DomainError::invariant("sweep produced more than one event"));
        }
        let e = match event {
            WarehouseEvent::ExpiredDiscarded(e) => e,
            other => return Err(unexpected("sweep", &other)),
        };

        tracing::info!(
            quantity = record.quantity,
            lost_value = %e.lost_value,
            %today,
            "expired baskets discarded"
        );

        Ok(SweepSummary::Discarded {
            quantity: record.quantity,
            lost_value: e.lost_value,
            record,
        })
    }

    /// Run a command that must yield exactly one event.
    fn execute_one(
        &mut self,
        cmd: WarehouseCommand,
        operation: &'static str,
    ) -> DomainResult<(WarehouseEvent, TransactionRecord)> {
        let mut applied = self.execute(cmd, operation)?;
        match (applied.pop(), applied.is_empty()) {
            (Some(one), true) => Ok(one),
            _ => Err(DomainError::invariant(format!(
                "{operation} must produce exactly one event"
            ))),
        }
    }

    fn execute(
        &mut self,
        cmd: WarehouseCommand,
        operation: &'static str,
    ) -> DomainResult<Vec<(WarehouseEvent, TransactionRecord)>> {
        let events = self.warehouse.handle(&cmd).inspect_err(|err| {
            tracing::debug!(operation, error = %err, "command rejected");
        })?;
        self.log.admit(&events).inspect_err(|err| {
            tracing::warn!(operation, error = %err, "command refused by the ledger");
        })?;

        let mut applied = Vec::with_capacity(events.len());
        for event in events {
            self.sequence += 1;
            let envelope = EventEnvelope::next(self.sequence, event);

            self.warehouse.apply(envelope.payload());
            self.log.apply(&envelope);

            let record = self
                .log
                .last()
                .filter(|r| r.sequence == self.sequence)
                .cloned()
                .ok_or_else(|| DomainError::invariant("projected event left no record"))?;
            applied.push((envelope.into_payload(), record));
        }

        Ok(applied)
    }
}

fn unexpected(operation: &str, event: &WarehouseEvent) -> DomainError {
    use larder_events::Event;
    DomainError::invariant(format!(
        "{operation} produced unexpected event {}",
        event.event_type()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use larder_core::ManualClock;
    use larder_ledger::TransactionKind;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Money {
        s.parse().unwrap()
    }

    fn engine() -> (LedgerEngine<Arc<ManualClock>>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_date(date(2025, 6, 1)));
        (LedgerEngine::with_clock(Arc::clone(&clock)), clock)
    }

    #[test]
    fn receive_logs_negative_delivery_price() {
        let (mut engine, _) = engine();
        let summary = engine.receive(money("100.00"), 10, date(2025, 7, 1)).unwrap();

        assert_eq!(summary.unit_cost, money("10.00"));
        assert_eq!(summary.unit_sale_price, money("12.00"));
        assert!(!summary.expired_on_arrival);
        assert_eq!(summary.record.kind, TransactionKind::Receive);
        assert_eq!(summary.record.amount, money("-100.00"));
        assert_eq!(summary.record.sequence, 1);
        assert_eq!(engine.check_stock(), StockReport { total: 10, expired: 0 });
    }

    #[test]
    fn past_expiry_is_accepted_but_flagged() {
        let (mut engine, _) = engine();
        let summary = engine.receive(money("10.00"), 2, date(2025, 5, 31)).unwrap();
        assert!(summary.expired_on_arrival);
        assert_eq!(engine.check_stock(), StockReport { total: 2, expired: 2 });
    }

    #[test]
    fn timestamps_come_from_the_clock() {
        let (mut engine, clock) = engine();
        engine.receive(money("10.00"), 1, date(2025, 7, 1)).unwrap();
        clock.advance(Duration::minutes(90));
        engine.sell(1).unwrap();

        let log = engine.list_transactions();
        assert_eq!(log[1].timestamp - log[0].timestamp, Duration::minutes(90));
    }

    #[test]
    fn rejected_calls_append_nothing() {
        let (mut engine, _) = engine();
        engine.receive(money("10.00"), 2, date(2025, 7, 1)).unwrap();

        assert!(matches!(
            engine.receive(money("10.00"), 0, date(2025, 7, 1)),
            Err(DomainError::InvalidQuantity(_))
        ));
        assert!(matches!(
            engine.receive(money("0.00"), 3, date(2025, 7, 1)),
            Err(DomainError::InvalidPrice(_))
        ));
        assert!(matches!(engine.sell(0), Err(DomainError::InvalidQuantity(_))));
        assert_eq!(
            engine.sell(5).unwrap_err(),
            DomainError::InsufficientStock {
                requested: 5,
                available: 2
            }
        );

        assert_eq!(engine.list_transactions().len(), 1);
        assert_eq!(engine.check_stock().total, 2);
        assert_eq!(engine.cash_balance(), money("-10.00"));
    }

    #[test]
    fn delivery_that_would_overflow_cash_is_refused_whole() {
        let (mut engine, _) = engine();
        let huge = money("50000000000000000000000000000");
        engine.receive(huge, 1, date(2025, 7, 1)).unwrap();

        assert!(matches!(
            engine.receive(huge, 1, date(2025, 7, 1)),
            Err(DomainError::ArithmeticFailure(_))
        ));
        assert_eq!(engine.list_transactions().len(), 1);
        assert_eq!(engine.check_stock().total, 1);
        assert_eq!(engine.cash_balance(), -huge);
        assert_eq!(engine.sales_revenue(), Money::ZERO);

        // The refused call did not burn a sequence number.
        engine.sell(1).unwrap();
        assert_eq!(engine.list_transactions()[1].sequence, 2);
    }

    #[test]
    fn sweep_reports_nothing_when_stock_is_fresh() {
        let (mut engine, _) = engine();
        engine.receive(money("10.00"), 2, date(2025, 6, 1)).unwrap();
        assert_eq!(engine.sweep_expired().unwrap(), SweepSummary::NothingToRemove);
        assert_eq!(engine.list_transactions().len(), 1);
    }

    #[test]
    fn custom_markup_flows_into_prices() {
        let config = EngineConfig {
            markup_rate: dec!(0.50),
        };
        let mut engine =
            LedgerEngine::with_config(&config, ManualClock::at_date(date(2025, 6, 1))).unwrap();
        let summary = engine.receive(money("30.00"), 3, date(2025, 7, 1)).unwrap();
        assert_eq!(summary.unit_sale_price, money("15.00"));
    }

    #[test]
    fn invalid_config_is_refused() {
        let config = EngineConfig {
            markup_rate: dec!(-0.20),
        };
        assert!(LedgerEngine::with_config(&config, SystemClock).is_err());
    }
}

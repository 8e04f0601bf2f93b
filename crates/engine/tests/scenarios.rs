use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

use larder_engine::{
    Clock, EngineError, LedgerEngine, ManualClock, Money, StockReport, SweepSummary,
    TransactionKind,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
}

fn money(s: &str) -> Money {
    s.parse().unwrap()
}

fn engine() -> (LedgerEngine<Arc<ManualClock>>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::at_date(today()));
    (LedgerEngine::with_clock(Arc::clone(&clock)), clock)
}

fn assert_balance_matches_log(engine: &LedgerEngine<Arc<ManualClock>>) {
    let summed = Money::new(
        engine
            .list_transactions()
            .iter()
            .map(|r| r.amount.amount())
            .sum::<rust_decimal::Decimal>(),
    );
    assert_eq!(engine.cash_balance(), summed);
}

#[test]
fn delivery_then_sale_then_write_off() {
    let (mut engine, clock) = engine();

    // Ten baskets for 100.00: unit cost 10.00, sale price 12.00.
    let received = engine
        .receive(money("100.00"), 10, clock.today() + Duration::days(30))
        .unwrap();
    assert_eq!(received.unit_sale_price, money("12.00"));
    assert!(engine.stock().iter().all(|b| b.unit_sale_price() == money("12.00")));
    assert_eq!(engine.list_transactions().len(), 1);
    assert_eq!(engine.list_transactions()[0].kind, TransactionKind::Receive);
    assert_eq!(engine.list_transactions()[0].amount, money("-100.00"));

    // Selling four takes 48.00 at the till.
    let sale = engine.sell(4).unwrap();
    assert_eq!(sale.sale_value, money("48.00"));
    assert_eq!(engine.check_stock().total, 6);
    assert_eq!(engine.sales_revenue(), money("48.00"));
    assert_eq!(engine.cash_balance(), money("-52.00"));
    let last = engine.list_transactions().last().unwrap();
    assert_eq!((last.kind, last.quantity, last.amount), (TransactionKind::Sale, 4, money("48.00")));

    // Five baskets that expired yesterday get written off.
    engine
        .receive(money("25.00"), 5, clock.today() - Duration::days(1))
        .unwrap();
    assert_eq!(engine.check_stock(), StockReport { total: 11, expired: 5 });

    let sweep = engine.sweep_expired().unwrap();
    let SweepSummary::Discarded {
        quantity,
        lost_value,
        record,
    } = sweep
    else {
        panic!("expected a discard");
    };
    // 25.00 / 5 = 5.00, marked up to 6.00 each.
    assert_eq!(quantity, 5);
    assert_eq!(lost_value, money("30.00"));
    assert_eq!(record.kind, TransactionKind::Discard);
    assert_eq!(record.amount, money("-30.00"));

    assert_eq!(engine.check_stock(), StockReport { total: 6, expired: 0 });
    // Till takings are untouched by a write-off.
    assert_eq!(engine.sales_revenue(), money("48.00"));
    assert_balance_matches_log(&engine);
}

#[test]
fn sweeping_twice_without_time_passing_is_a_no_op() {
    let (mut engine, clock) = engine();
    engine
        .receive(money("20.00"), 4, clock.today() - Duration::days(2))
        .unwrap();

    assert_eq!(engine.sweep_expired().unwrap().discarded_quantity(), 4);
    let logged = engine.list_transactions().len();

    assert_eq!(engine.sweep_expired().unwrap(), SweepSummary::NothingToRemove);
    assert_eq!(engine.list_transactions().len(), logged);
}

#[test]
fn stock_expires_as_the_clock_moves() {
    let (mut engine, clock) = engine();
    engine.receive(money("10.00"), 3, clock.today()).unwrap();
    assert_eq!(engine.check_stock().expired, 0);

    clock.advance(Duration::days(1));
    assert_eq!(engine.check_stock().expired, 3);
    assert_eq!(engine.sweep_expired().unwrap().discarded_quantity(), 3);
}

#[test]
fn overselling_changes_nothing() {
    let (mut engine, clock) = engine();
    engine
        .receive(money("30.00"), 3, clock.today() + Duration::days(5))
        .unwrap();
    let stock_before = engine.stock().to_vec();
    let log_before = engine.list_transactions().to_vec();
    let cash_before = engine.cash_balance();

    let err = engine.sell(4).unwrap_err();
    assert_eq!(
        err,
        EngineError::InsufficientStock {
            requested: 4,
            available: 3
        }
    );
    assert_eq!(engine.stock(), stock_before.as_slice());
    assert_eq!(engine.list_transactions(), log_before.as_slice());
    assert_eq!(engine.cash_balance(), cash_before);
}

#[test]
fn duplicate_prices_are_removed_one_by_one() {
    let (mut engine, clock) = engine();
    let expiry = clock.today() + Duration::days(10);
    // Three batches; two share the 6.00 price.
    engine.receive(money("10.00"), 2, expiry).unwrap(); // 2 x 6.00
    engine.receive(money("40.00"), 2, expiry).unwrap(); // 2 x 24.00
    engine.receive(money("15.00"), 3, expiry).unwrap(); // 3 x 6.00

    let sale = engine.sell(3).unwrap();
    assert_eq!(sale.sale_value, money("18.00"));

    let remaining: Vec<Money> = engine.stock().iter().map(|b| b.unit_sale_price()).collect();
    assert_eq!(
        remaining,
        vec![money("24.00"), money("24.00"), money("6.00"), money("6.00")]
    );
}

#[derive(Debug, Clone)]
enum Op {
    Receive { cents: i64, quantity: u32, days: i64 },
    Sell(u32),
    Sweep,
    Tick(i64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..100_000, 1u32..20, -3i64..10).prop_map(|(cents, quantity, days)| Op::Receive {
            cents,
            quantity,
            days
        }),
        (0u32..25).prop_map(Op::Sell),
        Just(Op::Sweep),
        (0i64..3).prop_map(Op::Tick),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        ..ProptestConfig::default()
    })]

    /// Property: across any sequence of operations the log grows by one per
    /// successful mutation, failures leave everything untouched, and the
    /// balance always equals the rounded sum of logged amounts.
    #[test]
    fn engine_invariants_hold(ops in prop::collection::vec(op(), 1..40)) {
        let (mut engine, clock) = engine();

        for op in ops {
            let log_len = engine.list_transactions().len();
            let stock = engine.stock().to_vec();

            match op {
                Op::Receive { cents, quantity, days } => {
                    let expiry = clock.today() + Duration::days(days);
                    match engine.receive(Money::from_cents(cents), quantity, expiry) {
                        Ok(summary) => {
                            prop_assert_eq!(engine.stock().len(), stock.len() + quantity as usize);
                            prop_assert_eq!(engine.list_transactions().len(), log_len + 1);
                            prop_assert_eq!(summary.record.amount, -Money::from_cents(cents));
                        }
                        Err(_) => {
                            prop_assert_eq!(engine.stock(), stock.as_slice());
                            prop_assert_eq!(engine.list_transactions().len(), log_len);
                        }
                    }
                }
                Op::Sell(n) => {
                    let mut prices: Vec<Money> = stock.iter().map(|b| b.unit_sale_price()).collect();
                    prices.sort();
                    match engine.sell(n) {
                        Ok(sale) => {
                            let expected = Money::checked_sum(prices[..n as usize].iter().copied()).unwrap();
                            prop_assert_eq!(sale.sale_value, expected);
                            prop_assert_eq!(engine.stock().len(), stock.len() - n as usize);
                            prop_assert_eq!(engine.list_transactions().len(), log_len + 1);

                            // Per price, exactly as many removed as were among the n cheapest.
                            let mut removed: HashMap<Money, i64> = HashMap::new();
                            for b in &stock {
                                *removed.entry(b.unit_sale_price()).or_default() += 1;
                            }
                            for b in engine.stock() {
                                *removed.entry(b.unit_sale_price()).or_default() -= 1;
                            }
                            let mut chosen: HashMap<Money, i64> = HashMap::new();
                            for p in &prices[..n as usize] {
                                *chosen.entry(*p).or_default() += 1;
                            }
                            for (price, count) in removed {
                                prop_assert_eq!(count, chosen.get(&price).copied().unwrap_or(0));
                            }
                        }
                        Err(EngineError::InvalidQuantity(_)) => prop_assert_eq!(n, 0),
                        Err(EngineError::InsufficientStock { requested, available }) => {
                            prop_assert_eq!(requested, n);
                            prop_assert_eq!(available, stock.len());
                            prop_assert_eq!(engine.stock(), stock.as_slice());
                            prop_assert_eq!(engine.list_transactions().len(), log_len);
                        }
                        Err(other) => prop_assert!(false, "unexpected error: {other:?}"),
                    }
                }
                Op::Sweep => {
                    let expired = engine.check_stock().expired;
                    match engine.sweep_expired().unwrap() {
                        SweepSummary::NothingToRemove => {
                            prop_assert_eq!(expired, 0);
                            prop_assert_eq!(engine.list_transactions().len(), log_len);
                        }
                        SweepSummary::Discarded { quantity, .. } => {
                            prop_assert_eq!(quantity as usize, expired);
                            prop_assert_eq!(engine.check_stock().expired, 0);
                            prop_assert_eq!(engine.list_transactions().len(), log_len + 1);
                        }
                    }
                }
                Op::Tick(days) => clock.advance(Duration::days(days)),
            }

            prop_assert!(engine.stock().iter().all(|b| b.unit_sale_price().is_positive()));
            let summed = Money::checked_sum(engine.list_transactions().iter().map(|r| r.amount)).unwrap();
            prop_assert_eq!(engine.cash_balance(), summed);
        }
    }
}

//! Scripted walk through one trading day on the system clock.

use anyhow::Context;
use chrono::Duration;

use larder_core::{Clock, SystemClock};
use larder_engine::{EngineConfig, LedgerEngine, SweepSummary};

fn main() -> anyhow::Result<()> {
    larder_observability::init();

    let config = EngineConfig::from_env();
    tracing::info!(markup_rate = %config.markup_rate, "starting larder demo");

    let mut engine =
        LedgerEngine::with_config(&config, SystemClock).context("invalid engine configuration")?;
    let today = engine.clock().today();

    let fresh = engine.receive("100.00".parse()?, 10, today + Duration::days(30))?;
    println!(
        "received {} baskets at {} each (unit cost {})",
        fresh.quantity, fresh.unit_sale_price, fresh.unit_cost
    );

    let stale = engine.receive("25.00".parse()?, 5, today - Duration::days(1))?;
    if stale.expired_on_arrival {
        println!(
            "warning: delivery of {} baskets expired on {}",
            stale.quantity, stale.expiry_date
        );
    }

    let sale = engine.sell(4)?;
    println!("sold {} baskets for {}", sale.quantity, sale.sale_value);

    match engine.sweep_expired()? {
        SweepSummary::NothingToRemove => println!("no expired baskets"),
        SweepSummary::Discarded {
            quantity,
            lost_value,
            ..
        } => println!("discarded {quantity} expired baskets worth {lost_value}"),
    }

    println!(
        "stock: {}",
        serde_json::to_string(&engine.check_stock()).context("serialize stock report")?
    );
    println!(
        "cash balance: {} (sales revenue {})",
        engine.cash_balance(),
        engine.sales_revenue()
    );

    println!("transactions (most recent first):");
    for record in engine.transaction_log().recent_first() {
        println!("  {record}");
    }

    Ok(())
}

//! Walks one order through cancellation and another through a return,
//! printing stock levels and the audit trail along the way.
//!
//! Configuration comes from `ORDER_LIFECYCLE_*` environment variables; by
//! default the demo uses a temporary database.

use anyhow::Context;
use order_lifecycle::{
    OrderError, OrderStatus, config::ServiceConfig, inventory::LineItem, logging::init_logging,
    service::OrderService,
};

fn main() -> anyhow::Result<()> {
    let mut config = ServiceConfig::load().context("loading configuration")?;
    if std::env::var("ORDER_LIFECYCLE_DB_PATH").is_err() {
        config.temporary = true;
    }
    init_logging(&config.log_filter);

    let service = OrderService::open(&config)?;
    service.set_stock("mug", 10)?;
    service.set_stock("lamp", 2)?;

    // cancelled before shipping: stock goes back
    let order = service.place_order(vec![LineItem::new("mug", 4)], "ingest")?;
    println!("placed {} -> mug stock {}", order.order_id, service.stock_of("mug")?);

    service.transition(&order.order_id, OrderStatus::CancelRequested, "customer")?;
    let outcome = service.transition(&order.order_id, OrderStatus::Cancelled, "cs-agent")?;
    println!(
        "{} (restore: {}) -> mug stock {}",
        outcome.record.summary(),
        outcome.effects.restore_inventory,
        service.stock_of("mug")?
    );

    // a stale client tries to cancel a delivered order
    let order = service.place_order(vec![LineItem::new("lamp", 1)], "ingest")?;
    for status in [
        OrderStatus::Preparing,
        OrderStatus::Shipped,
        OrderStatus::InTransit,
        OrderStatus::Delivered,
    ] {
        service.transition(&order.order_id, status, "ops")?;
    }

    match service.transition(&order.order_id, OrderStatus::CancelRequested, "stale-client") {
        Err(OrderError::Transition(err)) => {
            let choices: Vec<_> = err.allowed().iter().map(|status| status.label()).collect();
            println!("rejected: {err}");
            println!("operator may choose: {}", choices.join(" | "));
        }
        other => anyhow::bail!("expected a rejection, got {other:?}"),
    }

    service.transition(&order.order_id, OrderStatus::ReturnRequested, "customer")?;
    service.transition(&order.order_id, OrderStatus::Returned, "warehouse")?;
    println!("lamp stock after return: {}", service.stock_of("lamp")?);

    for record in service.history(&order.order_id)? {
        println!(
            "  r{} {} by {} at {}",
            record.revision,
            record.summary(),
            record.actor,
            record.timestamp.to_datetime_utc()
        );
    }

    service.flush()?;
    Ok(())
}

//! # Order Desk demo
//!
//! Runs one service cycle against the file snapshot store:
//! 1.  Restores the saved state (if any) and starts the [`OrderSystem`].
//! 2.  Takes a dine-in and a takeout order.
//! 3.  Lets the simulated kitchen prepare them and serves both.
//! 4.  Prints the history summary and shuts down.
//!
//! Configuration comes from the environment (and `.env`), see
//! [`DeskConfig::from_env`].

use order_desk::lifecycle::{setup_tracing, DeskConfig, OrderSystem};
use order_desk::model::OrderDraft;
use order_desk::snapshot::FileStore;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenvy::dotenv();
    setup_tracing();

    let config = DeskConfig::from_env().map_err(|e| e.to_string())?;
    info!(
        snapshot_dir = %config.snapshot_dir.display(),
        key = %config.snapshot_key,
        "Starting order desk"
    );

    let store = Arc::new(FileStore::new(&config.snapshot_dir));
    let kitchen_delay = config.kitchen_delay;
    let system = OrderSystem::start(config, store).await;
    let desk = system.desk_client.clone();
    let menu = desk.menu().await.map_err(|e| e.notice())?;

    // Dine-in order for table 5
    let mut draft = OrderDraft::new();
    draft.add(&menu, "tapsilog", 2).map_err(|e| e.notice())?;
    draft.add(&menu, "iced_tea", 2).map_err(|e| e.notice())?;
    info!(items = %draft.describe(&menu), "Dine-in draft");
    let dine_in = async {
        desk.create_order(draft.take_request(Some(5), Some("No onions".to_string())))
            .await
    }
    .instrument(tracing::info_span!("dine_in"))
    .await
    .map_err(|e| e.notice())?;

    // Takeout order
    draft.add(&menu, "adobo", 1).map_err(|e| e.notice())?;
    draft.add(&menu, "garlic_rice", 1).map_err(|e| e.notice())?;
    let takeout = async {
        desk.create_order(draft.take_request(None, Some("Takeout".to_string())))
            .await
    }
    .instrument(tracing::info_span!("takeout"))
    .await
    .map_err(|e| e.notice())?;

    let kitchen = async {
        desk.process_next_kitchen_order().await?;
        desk.process_next_kitchen_order().await?;
        tokio::time::sleep(kitchen_delay + std::time::Duration::from_millis(100)).await;
        desk.deliver_order(&dine_in.id).await?;
        desk.confirm_pickup(&takeout.id).await
    }
    .instrument(tracing::info_span!("kitchen"))
    .await;

    if let Err(e) = kitchen {
        error!(error = %e, notice = %e.notice(), "Service cycle failed");
    }

    match (desk.summary().await, desk.daily_summary(None).await) {
        (Ok(summary), Ok(today)) => info!(
            total = summary.total,
            delivered = summary.delivered,
            cancelled = summary.cancelled,
            today_orders = today.orders,
            today_revenue = today.revenue,
            "History summary"
        ),
        (Err(e), _) | (_, Err(e)) => error!(error = %e, "Summary unavailable"),
    }

    drop(desk);
    system.shutdown().await?;

    info!("Order desk stopped");
    Ok(())
}

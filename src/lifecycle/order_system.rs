use crate::clients::DeskClient;
use crate::engine::OrderBook;
use crate::framework::DeskActor;
use crate::lifecycle::DeskConfig;
use crate::model::Menu;
use crate::snapshot::{load_snapshot, SnapshotStore};
use std::sync::Arc;
use tracing::{error, info};

/// The runtime orchestrator of the order desk.
///
/// `OrderSystem` is responsible for:
/// - **Restoring state**: loading the saved snapshot into a fresh [`OrderBook`]
/// - **Lifecycle Management**: starting and stopping the desk actor
///
/// # Example
///
/// ```ignore
/// let store = Arc::new(FileStore::new(&config.snapshot_dir));
/// let system = OrderSystem::start(config, store).await;
///
/// let order = system.desk_client.create_order(request).await?;
/// system.desk_client.process_next_kitchen_order().await?;
///
/// // Gracefully shut down when done
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the desk actor
    pub desk_client: DeskClient,

    /// Task handle of the running actor (used for graceful shutdown)
    handle: tokio::task::JoinHandle<()>,
}

impl OrderSystem {
    /// Builds the book from the default menu and the saved snapshot, then spawns
    /// the actor. A missing or malformed snapshot starts the desk empty.
    pub async fn start(config: DeskConfig, store: Arc<dyn SnapshotStore>) -> Self {
        let mut book = OrderBook::new(Menu::default()).with_table_count(config.table_count);
        let snapshot = load_snapshot(store.as_ref(), &config.snapshot_key).await;
        book.restore(snapshot);
        Self::with_book(book, store, &config)
    }

    /// Spawns the actor over an already prepared book.
    pub fn with_book(book: OrderBook, store: Arc<dyn SnapshotStore>, config: &DeskConfig) -> Self {
        let (actor, handle) = DeskActor::new(book, store, config);
        let task = tokio::spawn(actor.run());
        info!(
            kitchen_delay_ms = config.kitchen_delay.as_millis() as u64,
            "Order desk started"
        );
        Self {
            desk_client: DeskClient::new(handle),
            handle: task,
        }
    }

    /// Gracefully shuts down the desk.
    ///
    /// Dropping the client closes the request channel; the actor then aborts its
    /// kitchen timers and exits its loop. Clones of the client held elsewhere keep
    /// the actor alive, so drop them first.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if the actor shut down cleanly
    /// - `Err(String)` if the actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down order desk...");

        drop(self.desk_client);

        if let Err(e) = self.handle.await {
            error!("Actor task failed: {:?}", e);
            return Err(format!("Actor task failed: {:?}", e));
        }

        info!("Order desk shutdown complete.");
        Ok(())
    }
}

//! # Order Desk Actor
//!
//! The order book is owned by a single task, the [`DeskActor`]. Everything else talks
//! to it through messages, so the book needs no `Mutex` and every operation runs to
//! completion before the next one starts.
//!
//! ## Key Types
//!
//! - [`DeskRequest`]: the messages the actor understands.
//! - [`DeskActor`]: the server half. Owns the book, the snapshot store and the kitchen timers.
//! - [`DeskHandle`]: the raw client half, a cloneable sender.
//! - [`FrameworkError`]: channel failures, plus domain rejections passed through.
//!
//! ## Kitchen timers
//!
//! Every order in `Preparing` has one pending timer task. When it expires the task sends
//! the order id back on an internal channel and the actor marks the order ready, unless
//! it has left `Preparing` in the meantime. Timers whose order is no longer preparing
//! are aborted after every request.

use crate::engine::{DailySummary, OrderBook, OrderError, Summary, UndoRecord};
use crate::lifecycle::DeskConfig;
use crate::model::{Menu, Order, OrderId, OrderRequest, OrderStatus};
use crate::snapshot::{save_snapshot, SnapshotStore};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

// =============================================================================
// 1. MESSAGES & ERRORS
// =============================================================================

/// Errors that can occur within the actor plumbing itself.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    /// The actor processed the request and the engine rejected it.
    #[error(transparent)]
    Rejected(#[from] OrderError),
}

/// Type alias for the one-shot response channel used by the actor.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Transitions addressed to a single order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Cancel,
    SetReady,
    Deliver,
    ConfirmPickup,
}

/// Read-only views of the book.
#[derive(Debug, Clone, PartialEq)]
pub enum DeskQuery {
    ActiveOrders,
    KitchenQueue,
    History,
    SearchHistory(String),
    HistoryByStatus(OrderStatus),
    Summary,
    /// `None` means the actor's current day.
    DailySummary(Option<NaiveDate>),
    Menu,
    Tables,
    UndoDepth,
}

/// Answers to [`DeskQuery`], one variant per query shape.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    Orders(Vec<Order>),
    Summary(Summary),
    DailySummary(DailySummary),
    Menu(Menu),
    Tables(Vec<u8>),
    UndoDepth(usize),
}

/// Messages sent to the [`DeskActor`].
///
/// Mutating requests (`Create`, `Action`, `ProcessNext`, `Undo`, `ToggleAvailability`)
/// persist a snapshot after they succeed; `Get` and `Query` never do.
#[derive(Debug)]
pub enum DeskRequest {
    Create {
        request: OrderRequest,
        respond_to: Response<Order>,
    },
    Get {
        id: OrderId,
        respond_to: Response<Option<Order>>,
    },
    Action {
        id: OrderId,
        action: OrderAction,
        respond_to: Response<Order>,
    },
    ProcessNext {
        respond_to: Response<Order>,
    },
    Undo {
        respond_to: Response<UndoRecord>,
    },
    ToggleAvailability {
        item_id: String,
        respond_to: Response<bool>,
    },
    Query {
        query: DeskQuery,
        respond_to: Response<QueryResult>,
    },
}

// =============================================================================
// 2. THE ACTOR SERVER
// =============================================================================

struct KitchenTimer {
    seq: u64,
    handle: JoinHandle<()>,
}

/// The actor that owns the order book.
///
/// Requests are processed sequentially from a bounded channel; kitchen timer
/// expirations arrive on a second, unbounded channel that the actor owns both ends
/// of, so dropping every [`DeskHandle`] still shuts the actor down.
pub struct DeskActor {
    receiver: mpsc::Receiver<DeskRequest>,
    book: OrderBook,
    store: Arc<dyn SnapshotStore>,
    snapshot_key: String,
    kitchen_delay: Duration,
    timers: HashMap<OrderId, KitchenTimer>,
    next_timer_seq: u64,
    timer_tx: mpsc::UnboundedSender<(OrderId, u64)>,
    timer_rx: mpsc::UnboundedReceiver<(OrderId, u64)>,
}

impl DeskActor {
    pub fn new(
        book: OrderBook,
        store: Arc<dyn SnapshotStore>,
        config: &DeskConfig,
    ) -> (Self, DeskHandle) {
        let (sender, receiver) = mpsc::channel(config.channel_buffer.max(1));
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let actor = Self {
            receiver,
            book,
            store,
            snapshot_key: config.snapshot_key.clone(),
            kitchen_delay: config.kitchen_delay,
            timers: HashMap::new(),
            next_timer_seq: 0,
            timer_tx,
            timer_rx,
        };
        (actor, DeskHandle::new(sender))
    }

    /// Runs the event loop until every handle is dropped.
    ///
    /// Orders already in `Preparing` (e.g. restored from a snapshot) get a fresh
    /// kitchen timer on startup.
    pub async fn run(mut self) {
        info!(
            orders = self.book.len(),
            queued = self.book.queue().len(),
            "Actor started"
        );
        self.sync_timers();

        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(msg) => self.handle(msg).await,
                    None => break,
                },
                Some((id, seq)) = self.timer_rx.recv() => self.on_kitchen_timer(id, seq).await,
            }
            self.sync_timers();
        }

        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
        info!(orders = self.book.len(), "Shutdown");
    }

    async fn handle(&mut self, msg: DeskRequest) {
        match msg {
            DeskRequest::Create { request, respond_to } => {
                debug!(?request, "Create");
                let result = self.book.create_order(request);
                self.commit(respond_to, result).await;
            }
            DeskRequest::Get { id, respond_to } => {
                let order = self.book.get(&id).cloned();
                debug!(order_id = %id, found = order.is_some(), "Get");
                let _ = respond_to.send(Ok(order));
            }
            DeskRequest::Action {
                id,
                action,
                respond_to,
            } => {
                debug!(order_id = %id, ?action, "Action");
                let result = match action {
                    OrderAction::Cancel => self.book.cancel_order(&id),
                    OrderAction::SetReady => self.book.set_order_ready(&id),
                    OrderAction::Deliver => self.book.deliver_order(&id),
                    OrderAction::ConfirmPickup => self.book.confirm_pickup(&id),
                };
                self.commit(respond_to, result).await;
            }
            DeskRequest::ProcessNext { respond_to } => {
                debug!("ProcessNext");
                let result = self.book.process_next();
                self.commit(respond_to, result).await;
            }
            DeskRequest::Undo { respond_to } => {
                debug!("Undo");
                let result = self.book.undo_last();
                self.commit(respond_to, result).await;
            }
            DeskRequest::ToggleAvailability {
                item_id,
                respond_to,
            } => {
                debug!(item_id = %item_id, "ToggleAvailability");
                let result = self.book.toggle_item_availability(&item_id);
                self.commit(respond_to, result).await;
            }
            DeskRequest::Query { query, respond_to } => {
                debug!(?query, "Query");
                let _ = respond_to.send(Ok(self.answer(query)));
            }
        }
    }

    fn answer(&self, query: DeskQuery) -> QueryResult {
        match query {
            DeskQuery::ActiveOrders => QueryResult::Orders(owned(self.book.active_orders())),
            DeskQuery::KitchenQueue => QueryResult::Orders(owned(self.book.queued_orders())),
            DeskQuery::History => QueryResult::Orders(owned(self.book.history())),
            DeskQuery::SearchHistory(text) => {
                QueryResult::Orders(owned(self.book.search_history(&text)))
            }
            DeskQuery::HistoryByStatus(status) => {
                QueryResult::Orders(owned(self.book.history_by_status(status)))
            }
            DeskQuery::Summary => QueryResult::Summary(self.book.summary()),
            DeskQuery::DailySummary(Some(date)) => {
                QueryResult::DailySummary(self.book.daily_summary(date))
            }
            DeskQuery::DailySummary(None) => QueryResult::DailySummary(self.book.today_summary()),
            DeskQuery::Menu => QueryResult::Menu(self.book.menu().clone()),
            DeskQuery::Tables => QueryResult::Tables(self.book.table_options().collect()),
            DeskQuery::UndoDepth => QueryResult::UndoDepth(self.book.undo_depth()),
        }
    }

    /// Persists after a successful mutation, then replies.
    async fn commit<T>(&mut self, respond_to: Response<T>, result: Result<T, OrderError>) {
        if result.is_ok() {
            self.persist().await;
        }
        let _ = respond_to.send(result.map_err(FrameworkError::from));
    }

    async fn persist(&self) {
        let snapshot = self.book.snapshot();
        if let Err(e) = save_snapshot(self.store.as_ref(), &self.snapshot_key, &snapshot).await {
            warn!(key = %self.snapshot_key, error = %e, "Failed to persist state");
        }
    }

    async fn on_kitchen_timer(&mut self, id: OrderId, seq: u64) {
        match self.timers.get(&id) {
            Some(timer) if timer.seq == seq => {
                self.timers.remove(&id);
            }
            _ => {
                debug!(order_id = %id, "Stale kitchen timer ignored");
                return;
            }
        }
        if let Some(order) = self.book.complete_preparation(&id) {
            info!(order_id = %order.id, takeout = order.is_takeout, "Kitchen finished preparing");
            self.persist().await;
        }
    }

    /// Aborts timers of orders that left `Preparing` and schedules timers for
    /// preparing orders that have none.
    fn sync_timers(&mut self) {
        let book = &self.book;
        self.timers.retain(|id, timer| {
            let preparing = book
                .get(id)
                .is_some_and(|order| order.status == OrderStatus::Preparing);
            if !preparing {
                timer.handle.abort();
                debug!(order_id = %id, "Kitchen timer cancelled");
            }
            preparing
        });

        for id in self.book.preparing() {
            if !self.timers.contains_key(&id) {
                self.schedule_kitchen_timer(id);
            }
        }
    }

    fn schedule_kitchen_timer(&mut self, id: OrderId) {
        self.next_timer_seq += 1;
        let seq = self.next_timer_seq;
        let delay = self.kitchen_delay;
        let tx = self.timer_tx.clone();
        let fired = id.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send((fired, seq));
        });
        debug!(order_id = %id, delay_ms = delay.as_millis() as u64, "Kitchen timer scheduled");
        self.timers.insert(id, KitchenTimer { seq, handle });
    }
}

fn owned(orders: Vec<&Order>) -> Vec<Order> {
    orders.into_iter().cloned().collect()
}

// =============================================================================
// 3. THE RAW CLIENT
// =============================================================================

/// Cloneable sender half of the actor channel.
///
/// Domain code should use [`DeskClient`](crate::clients::DeskClient), which wraps
/// this handle and maps errors to [`OrderError`].
#[derive(Clone, Debug)]
pub struct DeskHandle {
    sender: mpsc::Sender<DeskRequest>,
}

impl DeskHandle {
    pub fn new(sender: mpsc::Sender<DeskRequest>) -> Self {
        Self { sender }
    }

    /// Sends one request and waits for its reply.
    pub async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> DeskRequest,
    ) -> Result<T, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

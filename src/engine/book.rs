//! # Order Book
//!
//! The order lifecycle engine. An [`OrderBook`] owns every order in a single arena
//! keyed by [`OrderId`]; the active list, the kitchen queue and the history hold ids
//! only, so a transition mutates one arena entry and is visible everywhere.
//!
//! ## State machine
//!
//! ```text
//! Received --process_next--> Preparing --set_ready--> Ready --deliver--> Delivered
//!     \                          |                      | (takeout: confirm_pickup)
//!      `-------------------------+--------cancel--------+--> Cancelled
//! ```
//!
//! Each mutating operation validates first and then applies all of its collection
//! updates together with exactly one [`UndoRecord`]. A rejected operation leaves the
//! book untouched.

use super::{KitchenQueue, OrderError, UndoRecord, UndoStack};
use crate::model::{
    Menu, Order, OrderId, OrderLine, OrderRequest, OrderStatus, MAX_LINE_QTY, TAKEOUT_MODIFIER,
};
use crate::snapshot::Snapshot;
use chrono::{DateTime, Local, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

pub const NOTE_CANCELLED: &str = "Cancelled by staff";
pub const NOTE_PREPARING: &str = "Kitchen started preparing";
pub const NOTE_READY: &str = "Marked ready";
pub const NOTE_DELIVERED: &str = "Delivered to table";
pub const NOTE_PICKED_UP: &str = "Picked up by customer";

/// Number of tables offered when none is configured.
pub const DEFAULT_TABLE_COUNT: u8 = 15;

/// Source of the current local time.
pub type Clock = Box<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct OrderBook {
    menu: Menu,
    orders: HashMap<OrderId, Order>,
    active: Vec<OrderId>,
    queue: KitchenQueue,
    history: Vec<OrderId>,
    undo: UndoStack,
    table_count: u8,
    next_seq: u64,
    clock: Clock,
}

impl OrderBook {
    /// Creates an empty book over the given menu, using the system clock.
    pub fn new(menu: Menu) -> Self {
        Self {
            menu,
            orders: HashMap::new(),
            active: Vec::new(),
            queue: KitchenQueue::new(),
            history: Vec::new(),
            undo: UndoStack::new(),
            table_count: DEFAULT_TABLE_COUNT,
            next_seq: 0,
            clock: Box::new(Local::now),
        }
    }

    pub fn with_table_count(mut self, table_count: u8) -> Self {
        self.table_count = table_count;
        self
    }

    /// Replaces the clock, e.g. with a deterministic one in tests.
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Creates an order in state `Received`, appends it to the active list and
    /// the back of the kitchen queue.
    pub fn create_order(&mut self, request: OrderRequest) -> Result<Order, OrderError> {
        let takeout = request.is_takeout();
        if request.lines.is_empty() {
            warn!("Create rejected: no items");
            return Err(OrderError::InvalidOrderRequest(
                "Please add at least one item.".to_string(),
            ));
        }
        if let Some(line) = request
            .lines
            .iter()
            .find(|line| line.qty == 0 || line.qty > MAX_LINE_QTY)
        {
            warn!(item_id = %line.item_id, qty = line.qty, "Create rejected: quantity out of range");
            return Err(OrderError::InvalidOrderRequest(format!(
                "Quantity for {} must be between 1 and {}.",
                line.item_id, MAX_LINE_QTY
            )));
        }
        let table = if takeout {
            None
        } else {
            match request.table {
                None => {
                    warn!("Create rejected: dine-in without table");
                    return Err(OrderError::InvalidOrderRequest(
                        "Please select a table number.".to_string(),
                    ));
                }
                Some(table) if table == 0 || table > self.table_count => {
                    warn!(table, "Create rejected: no such table");
                    return Err(OrderError::InvalidOrderRequest(format!(
                        "Table {} does not exist.",
                        table
                    )));
                }
                Some(table) => Some(table),
            }
        };

        let now = (self.clock)();
        let id = self.next_order_id(&now);
        let annotation = request.annotation().map(str::to_string);
        let mut modifier = request.modifier.unwrap_or_default().trim().to_string();
        if takeout && modifier.is_empty() {
            modifier = TAKEOUT_MODIFIER.to_string();
        }
        let mut items = request.lines;
        if let Some(note) = annotation {
            items.push(OrderLine::modifier(note));
        }

        let order = Order {
            id: id.clone(),
            table,
            items,
            status: OrderStatus::Received,
            timestamp: now.format("%-I:%M:%S %p").to_string(),
            created_at: now.with_timezone(&Utc),
            date: now.date_naive(),
            modifier,
            is_takeout: takeout,
            picked_up: false,
            status_note: String::new(),
        };
        debug!(?order, "create_order");

        self.orders.insert(id.clone(), order.clone());
        self.active.push(id.clone());
        self.queue.enqueue(id.clone());
        self.sort_active();
        self.undo.push(UndoRecord::CreateOrder(id.clone()));

        info!(order_id = %id, ?table, takeout, total = order.total(&self.menu), queued = self.queue.len(), "Order created");
        Ok(order)
    }

    /// Cancels a Received, Preparing or Ready order.
    pub fn cancel_order(&mut self, id: &OrderId) -> Result<Order, OrderError> {
        let order = self.lookup(id)?;
        if order.status.is_terminal() {
            return Err(self.reject(id, order.status, format!("Order is already {}.", order.status)));
        }
        if order.is_takeout && order.status == OrderStatus::Ready {
            return Err(self.reject(id, order.status, "Takeout order is waiting for pickup."));
        }
        let before = order.clone();

        self.active.retain(|active| active != id);
        self.queue.remove(id);
        self.history.push(id.clone());
        let order = self.apply(id, |order| {
            order.status = OrderStatus::Cancelled;
            order.status_note = NOTE_CANCELLED.to_string();
        })?;
        self.undo.push(UndoRecord::CancelOrder(Box::new(before)));

        info!(order_id = %id, history = self.history.len(), "Order cancelled");
        Ok(order)
    }

    /// Takes the front of the kitchen queue and starts preparing it.
    pub fn process_next(&mut self) -> Result<Order, OrderError> {
        let id = self.queue.peek()?.clone();
        let status = self.lookup(&id)?.status;
        if status != OrderStatus::Received {
            return Err(self.reject(&id, status, "Only received orders can be prepared."));
        }

        self.queue.dequeue()?;
        let order = self.apply(&id, |order| {
            order.status = OrderStatus::Preparing;
            order.status_note = NOTE_PREPARING.to_string();
        })?;
        self.undo.push(UndoRecord::ProcessNext(id.clone()));

        info!(order_id = %id, queued = self.queue.len(), "Kitchen started preparing");
        Ok(order)
    }

    /// Marks a Preparing order as Ready. Takeout orders move straight to history,
    /// where they wait for pickup.
    pub fn set_order_ready(&mut self, id: &OrderId) -> Result<Order, OrderError> {
        let order = self.lookup(id)?;
        match order.status {
            OrderStatus::Preparing => {}
            OrderStatus::Received => {
                return Err(self.reject(
                    id,
                    order.status,
                    "Order is still waiting in queue. Process in kitchen first.",
                ))
            }
            status => {
                return Err(self.reject(id, status, format!("Order is already {}.", status)))
            }
        }
        let previous_status = order.status;
        let previous_note = order.status_note.clone();
        let takeout = order.is_takeout;

        let was_queued = self.queue.remove(id);
        if takeout {
            self.active.retain(|active| active != id);
            self.history.push(id.clone());
        }
        let order = self.apply(id, |order| {
            order.status = OrderStatus::Ready;
            order.status_note = NOTE_READY.to_string();
        })?;
        self.undo.push(UndoRecord::SetReady {
            id: id.clone(),
            previous_status,
            previous_note,
            was_queued,
        });

        info!(order_id = %id, takeout, "Order ready");
        Ok(order)
    }

    /// Kitchen timer callback. Marks the order ready only if it is still being
    /// prepared; otherwise the expiration is ignored.
    pub fn complete_preparation(&mut self, id: &OrderId) -> Option<Order> {
        match self.orders.get(id).map(|order| order.status) {
            Some(OrderStatus::Preparing) => self.set_order_ready(id).ok(),
            Some(status) => {
                debug!(order_id = %id, %status, "Kitchen timer ignored");
                None
            }
            None => {
                debug!(order_id = %id, "Kitchen timer ignored: order gone");
                None
            }
        }
    }

    /// Delivers a Ready dine-in order to its table.
    pub fn deliver_order(&mut self, id: &OrderId) -> Result<Order, OrderError> {
        let order = self.lookup(id)?;
        if order.is_takeout {
            return Err(self.reject(
                id,
                order.status,
                "This is a takeout order. Mark pickup from History.",
            ));
        }
        if order.status != OrderStatus::Ready {
            return Err(self.reject(id, order.status, "Only ready orders can be delivered."));
        }

        self.active.retain(|active| active != id);
        self.history.push(id.clone());
        let order = self.apply(id, |order| {
            order.status = OrderStatus::Delivered;
            order.status_note = NOTE_DELIVERED.to_string();
        })?;
        self.undo.push(UndoRecord::Deliver(id.clone()));

        info!(order_id = %id, history = self.history.len(), "Order delivered");
        Ok(order)
    }

    /// Confirms that a Ready takeout order was collected.
    pub fn confirm_pickup(&mut self, id: &OrderId) -> Result<Order, OrderError> {
        let order = self.lookup(id)?;
        if !order.is_takeout {
            return Err(self.reject(id, order.status, "Only takeout orders are picked up."));
        }
        if order.picked_up {
            return Err(self.reject(id, order.status, "Order was already picked up."));
        }
        if order.status != OrderStatus::Ready {
            return Err(self.reject(id, order.status, "Order is not ready for pickup."));
        }

        let order = self.apply(id, |order| {
            order.picked_up = true;
            order.status = OrderStatus::Delivered;
            order.status_note = NOTE_PICKED_UP.to_string();
        })?;
        self.undo.push(UndoRecord::ConfirmPickup(id.clone()));

        info!(order_id = %id, "Order picked up");
        Ok(order)
    }

    /// Reverses the most recent mutating operation and returns its record.
    pub fn undo_last(&mut self) -> Result<UndoRecord, OrderError> {
        let record = self.undo.pop().ok_or(OrderError::NothingToUndo)?;
        let id = record.order_id().clone();

        match &record {
            UndoRecord::CreateOrder(id) => {
                self.active.retain(|active| active != id);
                self.queue.remove(id);
                self.history.retain(|done| done != id);
                self.orders.remove(id);
            }
            UndoRecord::CancelOrder(before) => {
                let mut restored = (**before).clone();
                restored.status = OrderStatus::Received;
                restored.status_note.clear();
                self.history.retain(|done| done != &restored.id);
                if !self.active.contains(&restored.id) {
                    self.active.push(restored.id.clone());
                }
                if !self.queue.contains(&restored.id) {
                    self.queue.enqueue(restored.id.clone());
                }
                self.orders.insert(restored.id.clone(), restored);
            }
            UndoRecord::SetReady {
                id,
                previous_status,
                previous_note,
                was_queued,
            } => {
                // An undone cancel already put the order back in the queue as Received.
                let requeued = self.queue.contains(id);
                if let Some(order) = self.orders.get_mut(id) {
                    if !requeued {
                        order.status = *previous_status;
                        order.status_note = previous_note.clone();
                    }
                    if order.is_takeout {
                        self.history.retain(|done| done != id);
                        if !self.active.contains(id) {
                            self.active.push(id.clone());
                        }
                    }
                    if *was_queued && !requeued {
                        self.queue.enqueue(id.clone());
                    }
                }
            }
            UndoRecord::ProcessNext(id) => {
                if let Some(order) = self.orders.get_mut(id) {
                    order.status = OrderStatus::Received;
                    order.status_note.clear();
                    self.queue.remove(id);
                    self.queue.push_front(id.clone());
                }
            }
            UndoRecord::Deliver(id) => {
                if let Some(order) = self.orders.get_mut(id) {
                    order.status = OrderStatus::Ready;
                    order.status_note = NOTE_READY.to_string();
                    self.history.retain(|done| done != id);
                    self.active.push(id.clone());
                }
            }
            UndoRecord::ConfirmPickup(id) => {
                if let Some(order) = self.orders.get_mut(id) {
                    order.status = OrderStatus::Ready;
                    order.picked_up = false;
                    order.status_note = NOTE_READY.to_string();
                }
            }
        }
        self.sort_active();

        info!(kind = record.kind(), order_id = %id, remaining = self.undo.len(), "Undid last action");
        Ok(record)
    }

    /// Flips the availability of a menu item and returns the new flag.
    pub fn toggle_item_availability(&mut self, item_id: &str) -> Result<bool, OrderError> {
        let available = self
            .menu
            .toggle_availability(item_id)
            .ok_or_else(|| OrderError::UnknownMenuItem(item_id.to_string()))?;
        info!(item_id, available, "Menu availability changed");
        Ok(available)
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn table_count(&self) -> u8 {
        self.table_count
    }

    /// Table numbers offered for dine-in, `1..=table_count`.
    pub fn table_options(&self) -> impl Iterator<Item = u8> {
        1..=self.table_count
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.orders.contains_key(id)
    }

    /// Number of orders in the lookup table.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Active orders, ascending by creation time.
    pub fn active_orders(&self) -> Vec<&Order> {
        self.resolve(&self.active)
    }

    /// Orders awaiting the kitchen, front first.
    pub fn queued_orders(&self) -> Vec<&Order> {
        self.queue.iter().filter_map(|id| self.orders.get(id)).collect()
    }

    pub fn queue(&self) -> &KitchenQueue {
        &self.queue
    }

    /// History in the order entries were appended.
    pub fn history(&self) -> Vec<&Order> {
        self.resolve(&self.history)
    }

    /// History entries matching a free-text query. An empty query returns everything.
    pub fn search_history(&self, query: &str) -> Vec<&Order> {
        self.history()
            .into_iter()
            .filter(|order| order.matches(query))
            .collect()
    }

    pub fn history_by_status(&self, status: OrderStatus) -> Vec<&Order> {
        self.history()
            .into_iter()
            .filter(|order| order.status == status)
            .collect()
    }

    /// Ids of orders currently being prepared.
    pub fn preparing(&self) -> Vec<OrderId> {
        self.active
            .iter()
            .filter(|id| {
                self.orders
                    .get(*id)
                    .is_some_and(|order| order.status == OrderStatus::Preparing)
            })
            .cloned()
            .collect()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn total(&self, order: &Order) -> u32 {
        order.total(&self.menu)
    }

    pub(crate) fn now(&self) -> DateTime<Local> {
        (self.clock)()
    }

    // =========================================================================
    // Snapshot
    // =========================================================================

    /// Captures the persistent part of the state. The undo stack is not persisted.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            active_orders: self.active.clone(),
            history: self.history.clone(),
            kitchen_queue: self.queue.iter().cloned().collect(),
            orders: self
                .orders
                .iter()
                .map(|(id, order)| (id.clone(), order.clone()))
                .collect(),
            menu_availability: self.menu.availability(),
        }
    }

    /// Replaces the in-memory state with a snapshot. References to orders missing
    /// from the snapshot's lookup table are dropped, as are queue entries for orders
    /// that are no longer Received.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.orders = snapshot
            .orders
            .into_values()
            .map(|order| (order.id.clone(), order))
            .collect();

        let mut dropped = 0usize;
        let active = self.known_ids(snapshot.active_orders, &mut dropped);
        let history = self.known_ids(snapshot.history, &mut dropped);
        let queue = self.known_ids(snapshot.kitchen_queue, &mut dropped);
        let (queue, not_received): (Vec<_>, Vec<_>) = queue.into_iter().partition(|id| {
            self.orders
                .get(id)
                .is_some_and(|order| order.status == OrderStatus::Received)
        });
        self.active = active;
        self.history = history;
        self.queue = queue.into_iter().collect();
        self.menu.apply_availability(&snapshot.menu_availability);
        self.undo.clear();
        self.sort_active();

        if dropped > 0 {
            warn!(dropped, "Snapshot referenced unknown orders");
        }
        if !not_received.is_empty() {
            warn!(
                dropped = not_received.len(),
                "Snapshot queued orders that are not Received"
            );
        }
        info!(
            orders = self.orders.len(),
            active = self.active.len(),
            queued = self.queue.len(),
            history = self.history.len(),
            "State restored"
        );
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lookup(&self, id: &OrderId) -> Result<&Order, OrderError> {
        self.orders.get(id).ok_or_else(|| {
            warn!(order_id = %id, "Not found");
            OrderError::UnknownOrder(id.clone())
        })
    }

    fn reject(&self, id: &OrderId, status: OrderStatus, reason: impl Into<String>) -> OrderError {
        let error = OrderError::invalid_transition(id, status, reason);
        warn!(order_id = %id, %status, error = %error, "Transition rejected");
        error
    }

    /// Mutates an arena entry and returns a copy of the result.
    fn apply(&mut self, id: &OrderId, f: impl FnOnce(&mut Order)) -> Result<Order, OrderError> {
        let order = self
            .orders
            .get_mut(id)
            .ok_or_else(|| OrderError::UnknownOrder(id.clone()))?;
        f(order);
        Ok(order.clone())
    }

    fn resolve(&self, ids: &[OrderId]) -> Vec<&Order> {
        ids.iter().filter_map(|id| self.orders.get(id)).collect()
    }

    fn sort_active(&mut self) {
        let orders = &self.orders;
        self.active
            .sort_by_key(|id| orders.get(id).map(|order| order.created_at));
    }

    fn known_ids(&self, ids: Vec<OrderId>, dropped: &mut usize) -> Vec<OrderId> {
        let mut seen = HashSet::new();
        ids.into_iter()
            .filter(|id| {
                let keep = self.orders.contains_key(id) && seen.insert(id.clone());
                if !keep {
                    *dropped += 1;
                }
                keep
            })
            .collect()
    }

    fn next_order_id(&mut self, now: &DateTime<Local>) -> OrderId {
        let stamp = to_base36(now.timestamp_millis().max(0) as u64);
        loop {
            self.next_seq += 1;
            let id = OrderId(format!("ORD-{}-{}", stamp, self.next_seq));
            if !self.orders.contains_key(&id) {
                return id;
            }
        }
    }
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while value > 0 {
        out.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    /// Clock that advances one second per reading.
    fn ticking_book() -> OrderBook {
        let tick = Arc::new(AtomicI64::new(0));
        let start = Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        OrderBook::new(Menu::default()).with_clock(move || {
            start + Duration::seconds(tick.fetch_add(1, Ordering::SeqCst))
        })
    }

    fn tapsilog_for(table: u8) -> OrderRequest {
        OrderRequest::dine_in(table, vec![OrderLine::new("tapsilog", 2)])
    }

    #[test]
    fn test_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
    }

    #[test]
    fn test_create_validation() {
        let mut book = ticking_book();

        let empty = OrderRequest::dine_in(5, vec![]);
        assert!(matches!(book.create_order(empty), Err(OrderError::InvalidOrderRequest(_))));

        let no_table = OrderRequest {
            lines: vec![OrderLine::new("egg", 1)],
            ..Default::default()
        };
        let err = book.create_order(no_table).unwrap_err();
        assert_eq!(err.notice(), "Please select a table number.");

        assert!(book.create_order(tapsilog_for(16)).is_err());
        let too_many = OrderRequest::dine_in(1, vec![OrderLine::new("egg", 21)]);
        assert!(book.create_order(too_many).is_err());

        assert!(book.is_empty());
        assert_eq!(book.undo_depth(), 0);
    }

    #[test]
    fn test_modifier_line_and_takeout_table() {
        let mut book = ticking_book();

        let noted = book
            .create_order(tapsilog_for(2).with_modifier("No onions"))
            .unwrap();
        assert_eq!(noted.items.len(), 2);
        assert!(noted.items[1].is_modifier());
        assert_eq!(noted.items[1].note.as_deref(), Some("No onions"));
        assert_eq!(book.total(&noted), 190);

        let mut takeout = OrderRequest::takeout(vec![OrderLine::new("iced_tea", 1)]);
        takeout.table = Some(4);
        let takeout = book.create_order(takeout).unwrap();
        assert_eq!(takeout.table, None);
        assert_eq!(takeout.modifier, "Takeout");
        assert_eq!(takeout.items.len(), 1);
    }

    #[test]
    fn test_ids_are_unique_under_frozen_clock() {
        let frozen = Local.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        let mut book = OrderBook::new(Menu::default()).with_clock(move || frozen);
        let a = book.create_order(tapsilog_for(1)).unwrap();
        let b = book.create_order(tapsilog_for(1)).unwrap();
        assert_ne!(a.id, b.id);
        assert!(a.id.0.starts_with("ORD-"));
    }

    #[test]
    fn test_set_ready_requires_preparing() {
        let mut book = ticking_book();
        let order = book.create_order(tapsilog_for(3)).unwrap();

        let err = book.set_order_ready(&order.id).unwrap_err();
        assert_eq!(
            err.notice(),
            "Order is still waiting in queue. Process in kitchen first."
        );
        assert_eq!(book.undo_depth(), 1);
    }

    #[test]
    fn test_cancel_preparing_order() {
        let mut book = ticking_book();
        let order = book.create_order(tapsilog_for(3)).unwrap();
        book.process_next().unwrap();

        let cancelled = book.cancel_order(&order.id).unwrap();
        assert_eq!(cancelled.status, OrderStatus::Cancelled);
        assert_eq!(cancelled.status_note, NOTE_CANCELLED);
        assert!(book.active_orders().is_empty());
        assert_eq!(book.history().len(), 1);

        // the kitchen timer fires later and must not resurrect the order
        assert!(book.complete_preparation(&order.id).is_none());
        assert_eq!(book.get(&order.id).unwrap().status, OrderStatus::Cancelled);

        let err = book.cancel_order(&order.id).unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[test]
    fn test_undo_process_next_restores_front() {
        let mut book = ticking_book();
        let first = book.create_order(tapsilog_for(1)).unwrap();
        let second = book.create_order(tapsilog_for(2)).unwrap();

        book.process_next().unwrap();
        let queued: Vec<_> = book.queue().iter().cloned().collect();
        assert_eq!(queued, vec![second.id.clone()]);

        let record = book.undo_last().unwrap();
        assert_eq!(record, UndoRecord::ProcessNext(first.id.clone()));
        let queued: Vec<_> = book.queue().iter().cloned().collect();
        assert_eq!(queued, vec![first.id.clone(), second.id]);
        let restored = book.get(&first.id).unwrap();
        assert_eq!(restored.status, OrderStatus::Received);
        assert!(restored.status_note.is_empty());
    }

    #[test]
    fn test_undo_takeout_ready_returns_to_active() {
        let mut book = ticking_book();
        let order = book
            .create_order(OrderRequest::takeout(vec![OrderLine::new("adobo", 1)]))
            .unwrap();
        book.process_next().unwrap();
        book.set_order_ready(&order.id).unwrap();
        assert!(book.active_orders().is_empty());

        book.undo_last().unwrap();
        let restored = book.get(&order.id).unwrap();
        assert_eq!(restored.status, OrderStatus::Preparing);
        assert_eq!(restored.status_note, NOTE_PREPARING);
        assert_eq!(book.active_orders().len(), 1);
        assert!(book.history().is_empty());
        assert!(book.queue().is_empty());
    }

    #[test]
    fn test_undo_deliver_and_pickup() {
        let mut book = ticking_book();
        let dine_in = book.create_order(tapsilog_for(7)).unwrap();
        book.process_next().unwrap();
        book.set_order_ready(&dine_in.id).unwrap();
        book.deliver_order(&dine_in.id).unwrap();

        book.undo_last().unwrap();
        assert_eq!(book.get(&dine_in.id).unwrap().status, OrderStatus::Ready);
        assert_eq!(book.active_orders().len(), 1);
        assert!(book.history().is_empty());

        let takeout = book
            .create_order(OrderRequest::takeout(vec![OrderLine::new("egg", 2)]))
            .unwrap();
        book.process_next().unwrap();
        book.set_order_ready(&takeout.id).unwrap();
        book.confirm_pickup(&takeout.id).unwrap();
        assert!(book.confirm_pickup(&takeout.id).is_err());

        book.undo_last().unwrap();
        let order = book.get(&takeout.id).unwrap();
        assert_eq!(order.status, OrderStatus::Ready);
        assert!(!order.picked_up);
    }

    #[test]
    fn test_deliver_rejects_takeout() {
        let mut book = ticking_book();
        let order = book
            .create_order(OrderRequest::takeout(vec![OrderLine::new("egg", 1)]))
            .unwrap();
        book.process_next().unwrap();
        book.set_order_ready(&order.id).unwrap();

        let err = book.deliver_order(&order.id).unwrap_err();
        assert_eq!(err.notice(), "This is a takeout order. Mark pickup from History.");
        let err = book.cancel_order(&order.id).unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition { .. }));
    }

    #[test]
    fn test_toggle_unknown_item() {
        let mut book = ticking_book();
        assert_eq!(book.toggle_item_availability("egg"), Ok(false));
        assert_eq!(
            book.toggle_item_availability("caviar"),
            Err(OrderError::UnknownMenuItem("caviar".to_string()))
        );
        assert_eq!(book.undo_depth(), 0);
    }

    #[test]
    fn test_restore_drops_dangling_references() {
        let mut book = ticking_book();
        let order = book.create_order(tapsilog_for(1)).unwrap();
        let mut snapshot = book.snapshot();
        snapshot.kitchen_queue.push(OrderId::from("ORD-ghost-1"));
        snapshot.active_orders.push(order.id.clone());

        let mut restored = ticking_book();
        restored.restore(snapshot);
        assert_eq!(restored.active_orders().len(), 1);
        assert_eq!(restored.queue().len(), 1);
        assert_eq!(restored.undo_depth(), 0);
    }
}

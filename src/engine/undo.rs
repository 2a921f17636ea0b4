//! Reversible action records.
//!
//! Every mutating operation of the [`OrderBook`](super::OrderBook) pushes exactly one
//! [`UndoRecord`]; [`OrderBook::undo_last`](super::OrderBook::undo_last) pops the most
//! recent one and reverses it. There is no redo.

use crate::model::{Order, OrderId, OrderStatus};

/// One reversible action. Each variant carries exactly what is needed to invert it.
#[derive(Debug, Clone, PartialEq)]
pub enum UndoRecord {
    /// An order was created. Undo discards it entirely.
    CreateOrder(OrderId),
    /// An order was cancelled. Carries the order as it was before cancellation.
    CancelOrder(Box<Order>),
    /// An order was marked ready.
    SetReady {
        id: OrderId,
        previous_status: OrderStatus,
        previous_note: String,
        /// Whether set-ready took the order out of the kitchen queue.
        was_queued: bool,
    },
    /// The kitchen started preparing the front of the queue.
    ProcessNext(OrderId),
    /// A dine-in order was delivered to its table.
    Deliver(OrderId),
    /// A takeout order was picked up.
    ConfirmPickup(OrderId),
}

impl UndoRecord {
    /// The order the record refers to.
    pub fn order_id(&self) -> &OrderId {
        match self {
            UndoRecord::CreateOrder(id)
            | UndoRecord::ProcessNext(id)
            | UndoRecord::Deliver(id)
            | UndoRecord::ConfirmPickup(id) => id,
            UndoRecord::CancelOrder(order) => &order.id,
            UndoRecord::SetReady { id, .. } => id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            UndoRecord::CreateOrder(_) => "create",
            UndoRecord::CancelOrder(_) => "cancel",
            UndoRecord::SetReady { .. } => "set_ready",
            UndoRecord::ProcessNext(_) => "process_next",
            UndoRecord::Deliver(_) => "deliver",
            UndoRecord::ConfirmPickup(_) => "confirm_pickup",
        }
    }
}

/// Last-in-first-out stack of undo records.
#[derive(Debug, Clone, Default)]
pub struct UndoStack {
    records: Vec<UndoRecord>,
}

impl UndoStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: UndoRecord) {
        self.records.push(record);
    }

    pub fn pop(&mut self) -> Option<UndoRecord> {
        self.records.pop()
    }

    pub fn peek(&self) -> Option<&UndoRecord> {
        self.records.last()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}

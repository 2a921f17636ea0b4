//! FIFO queue of orders awaiting kitchen action.

use super::OrderError;
use crate::model::OrderId;
use std::collections::VecDeque;

/// Strict FIFO sequence of order ids. No reordering, no priority.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KitchenQueue {
    items: VecDeque<OrderId>,
}

impl KitchenQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends to the back.
    pub fn enqueue(&mut self, id: OrderId) {
        self.items.push_back(id);
    }

    /// Removes and returns the front element.
    pub fn dequeue(&mut self) -> Result<OrderId, OrderError> {
        self.items.pop_front().ok_or(OrderError::EmptyQueue)
    }

    /// Returns the front element without removing it.
    pub fn peek(&self) -> Result<&OrderId, OrderError> {
        self.items.front().ok_or(OrderError::EmptyQueue)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn contains(&self, id: &OrderId) -> bool {
        self.items.contains(id)
    }

    /// Puts an order back in the "next up" position.
    pub fn push_front(&mut self, id: OrderId) {
        self.items.push_front(id);
    }

    /// Removes an order wherever it sits. Returns false if it was not queued.
    pub fn remove(&mut self, id: &OrderId) -> bool {
        match self.items.iter().position(|queued| queued == id) {
            Some(index) => {
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &OrderId> {
        self.items.iter()
    }
}

impl FromIterator<OrderId> for KitchenQueue {
    fn from_iter<I: IntoIterator<Item = OrderId>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

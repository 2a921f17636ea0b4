//! Error types for the order engine.

use crate::model::{OrderId, OrderStatus};
use thiserror::Error;

/// Errors that can occur during order operations.
///
/// Every variant is recoverable: the state is left untouched and the caller is
/// expected to show [`OrderError::notice`] to the user.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Processing was requested with nothing queued.
    #[error("Kitchen queue is empty")]
    EmptyQueue,

    /// Undo was requested with an empty undo stack.
    #[error("Nothing to undo")]
    NothingToUndo,

    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    UnknownOrder(OrderId),

    /// The creation payload is missing a table or has no usable lines.
    #[error("Invalid order request: {0}")]
    InvalidOrderRequest(String),

    /// The operation is not valid in the order's current state.
    #[error("Invalid transition for {id} ({status}): {reason}")]
    InvalidTransition {
        id: OrderId,
        status: OrderStatus,
        reason: String,
    },

    /// The menu item id does not exist in the catalog.
    #[error("Unknown menu item: {0}")]
    UnknownMenuItem(String),

    /// The menu item exists but is marked unavailable.
    #[error("Menu item unavailable: {0}")]
    ItemUnavailable(String),

    /// An error occurred while communicating with the order desk actor.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl OrderError {
    pub(crate) fn invalid_transition(
        id: &OrderId,
        status: OrderStatus,
        reason: impl Into<String>,
    ) -> Self {
        OrderError::InvalidTransition {
            id: id.clone(),
            status,
            reason: reason.into(),
        }
    }

    /// Short message suitable for an end-user notice.
    pub fn notice(&self) -> String {
        match self {
            OrderError::EmptyQueue => "No orders in the kitchen queue.".to_string(),
            OrderError::NothingToUndo => "Nothing to undo.".to_string(),
            OrderError::UnknownOrder(id) => format!("Order {} no longer exists.", id),
            OrderError::InvalidOrderRequest(reason) => reason.clone(),
            OrderError::InvalidTransition { reason, .. } => reason.clone(),
            OrderError::UnknownMenuItem(_) | OrderError::ItemUnavailable(_) => {
                "This item is currently unavailable.".to_string()
            }
            OrderError::ActorCommunicationError(_) => {
                "The order desk is not running.".to_string()
            }
        }
    }
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

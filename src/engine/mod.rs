//! The order lifecycle engine: kitchen queue, undo history and the order book
//! that ties them together.

pub mod book;
pub mod error;
pub mod queue;
pub mod report;
pub mod undo;

pub use book::{
    Clock, OrderBook, DEFAULT_TABLE_COUNT, NOTE_CANCELLED, NOTE_DELIVERED, NOTE_PICKED_UP,
    NOTE_PREPARING, NOTE_READY,
};
pub use error::OrderError;
pub use queue::KitchenQueue;
pub use report::{DailySummary, Summary};
pub use undo::{UndoRecord, UndoStack};

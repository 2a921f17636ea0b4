//! Actor plumbing for the order desk.
//!
//! This module puts the [`OrderBook`](crate::engine::OrderBook) behind a message
//! channel so that any number of async callers can share it.
//!
//! # Main Components
//!
//! - [`DeskActor`] - Owns the book and the kitchen timers, processes requests one at a time
//! - [`DeskHandle`] - Raw cloneable sender
//! - [`DeskRequest`] / [`DeskQuery`] - The message vocabulary
//! - [`FrameworkError`] - Channel errors
//!
//! # Testing
//!
//! See [`mock`] module for utilities to test clients without spawning the actor.

pub mod core;
pub mod mock;

pub use self::core::*;

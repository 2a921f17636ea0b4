//! # Order Desk
//!
//! > **Order lifecycle, kitchen queue and undo for a small restaurant.**
//!
//! Staff take dine-in or takeout orders; each order travels through
//! `Received -> Preparing -> Ready -> Delivered` (or `Cancelled`), waits in a strict
//! FIFO kitchen queue, is marked ready by a simulated kitchen timer, and every
//! mutating action can be undone, most recent first. State survives restarts as a
//! single JSON snapshot.
//!
//! ## Design
//!
//! ### 1. One owner for all state
//! Orders live in a single arena inside [`OrderBook`](engine::OrderBook); the active
//! list, the kitchen queue and the history only hold ids. A status change is made once
//! and is visible from every view.
//!
//! ### 2. Actor around the book
//! The book is owned by one Tokio task, the [`DeskActor`](framework::DeskActor), which
//! processes requests sequentially. Kitchen timers are plain tasks that report back to
//! the actor, so a timer can never race a staff action.
//!
//! ### 3. Typed errors
//! Every rejected operation returns an [`OrderError`](engine::OrderError) and leaves the
//! state untouched. [`OrderError::notice`](engine::OrderError::notice) gives the text to
//! show to staff.
//!
//! ## Module Tour
//!
//! ### 1. The Data ([`model`])
//! Menu catalog, orders, order drafts. No behaviour beyond pricing and search.
//!
//! ### 2. The Engine ([`engine`])
//! Kitchen queue, undo stack, the [`OrderBook`](engine::OrderBook) state machine and
//! history reports. Synchronous and deterministic (the clock is injectable).
//!
//! ### 3. The Actor ([`framework`])
//! Message vocabulary, the actor loop with kitchen timers, and a [`mock`](framework::mock)
//! module for testing callers.
//!
//! ### 4. The Interface ([`clients`])
//! [`DeskClient`](clients::DeskClient): one async method per operation.
//!
//! ### 5. Persistence ([`snapshot`])
//! The snapshot document and its stores.
//!
//! ### 6. The Orchestrator ([`lifecycle`])
//! Configuration, tracing setup, and [`OrderSystem`](lifecycle::OrderSystem) which
//! restores state, spawns the actor and shuts it down.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=info cargo run
//! cargo test
//! ```

pub mod clients;
pub mod engine;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod snapshot;

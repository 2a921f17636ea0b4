//! Startup, configuration and shutdown of the order desk.

pub mod config;
pub mod order_system;
pub mod tracing;

pub use config::{ConfigError, DeskConfig};
pub use order_system::OrderSystem;
pub use self::tracing::setup_tracing;

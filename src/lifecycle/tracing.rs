//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing-subscriber` formatter filtered by
//! the `RUST_LOG` environment variable.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: startup (with restored order counts) and shutdown
//! - **Transitions**: every applied transition at `info`, every rejected one at `warn`
//! - **Kitchen timers**: scheduling, cancellation and expiry at `debug`
//! - **Persistence**: snapshot load at `info`, failed saves at `warn`
//! - **Client calls**: one span per [`DeskClient`](crate::clients::DeskClient) method
//!
//! ## Usage Examples
//!
//! ```bash
//! # Transitions only
//! RUST_LOG=info cargo run
//!
//! # Full request payloads and timer activity
//! RUST_LOG=debug cargo run
//!
//! # Just the engine
//! RUST_LOG=order_desk::engine=debug cargo run
//! ```
//!
//! With `RUST_LOG=info` a short session reads:
//!
//! ```text
//! INFO create_order: Sending create_order to actor
//! INFO Order created order_id=ORD-m5x2k1c0-1 table=Some(5) takeout=false total=190 queued=1
//! INFO Kitchen started preparing order_id=ORD-m5x2k1c0-1 queued=0
//! INFO Order ready order_id=ORD-m5x2k1c0-1 takeout=false
//! INFO Kitchen finished preparing order_id=ORD-m5x2k1c0-1 takeout=false
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}

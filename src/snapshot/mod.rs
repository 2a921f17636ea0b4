//! # Snapshot Persistence
//!
//! The whole engine state (minus the undo stack) is serialized into a single JSON
//! document stored under one well-known key. The document carries:
//!
//! - `activeOrders`: ids in display order
//! - `history`: ids in append order
//! - `kitchenQueue`: ids, front first
//! - `ordersMap`: every order keyed by id
//! - `menuAvailability`: availability flag per menu item
//!
//! A missing or unreadable document is not fatal: [`load_snapshot`] logs a warning
//! and the desk starts empty.

pub mod store;

pub use store::{FileStore, MemoryStore, SnapshotStore};

use crate::model::{ItemAvailability, Order, OrderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{info, warn};

/// Storage key used when none is configured.
pub const DEFAULT_SNAPSHOT_KEY: &str = "restaurantOrders";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Invalid snapshot key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub active_orders: Vec<OrderId>,
    pub history: Vec<OrderId>,
    pub kitchen_queue: Vec<OrderId>,
    #[serde(rename = "ordersMap")]
    pub orders: BTreeMap<OrderId, Order>,
    pub menu_availability: Vec<ItemAvailability>,
}

impl Snapshot {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(doc: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(doc)?)
    }
}

/// Reads the snapshot under `key`, falling back to an empty one when the document
/// is absent or cannot be parsed.
pub async fn load_snapshot(store: &dyn SnapshotStore, key: &str) -> Snapshot {
    let doc = match store.load(key).await {
        Ok(Some(doc)) => doc,
        Ok(None) => {
            info!(key, "No saved state, starting empty");
            return Snapshot::default();
        }
        Err(e) => {
            warn!(key, error = %e, "Could not read saved state, starting empty");
            return Snapshot::default();
        }
    };

    match Snapshot::from_json(&doc) {
        Ok(snapshot) => {
            info!(key, orders = snapshot.orders.len(), "Loaded saved state");
            snapshot
        }
        Err(e) => {
            warn!(key, error = %e, "Saved state is malformed, starting empty");
            Snapshot::default()
        }
    }
}

/// Serializes and writes a snapshot under `key`.
pub async fn save_snapshot(
    store: &dyn SnapshotStore,
    key: &str,
    snapshot: &Snapshot,
) -> Result<(), SnapshotError> {
    let doc = snapshot.to_json()?;
    store.save(key, &doc).await
}

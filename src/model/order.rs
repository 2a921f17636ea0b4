/// Represents a customer order moving through the kitchen.
///
/// Orders live in the [`OrderBook`](crate::engine::OrderBook) arena and are
/// referenced by [`OrderId`] from the active list, the kitchen queue and the history.
use crate::model::Menu;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Marker item id of the zero-price annotation line carrying a modifier note.
pub const MODIFIER_ITEM_ID: &str = "modifier";

/// Modifier value that selects takeout service.
pub const TAKEOUT_MODIFIER: &str = "Takeout";

/// Largest quantity a single order line may carry.
pub const MAX_LINE_QTY: u8 = 20;

/// Type-safe identifier for Orders, e.g. `ORD-m5x2k1c0-7`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Received,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            OrderStatus::Received => "Received",
            OrderStatus::Preparing => "Preparing",
            OrderStatus::Ready => "Ready",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(label)
    }
}

/// One line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Menu item id, or [`MODIFIER_ITEM_ID`] for an annotation line.
    pub item_id: String,
    pub qty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OrderLine {
    pub fn new(item_id: impl Into<String>, qty: u8) -> Self {
        Self {
            item_id: item_id.into(),
            qty,
            note: None,
        }
    }

    /// Zero-price line carrying a modifier note such as "No onions".
    pub fn modifier(note: impl Into<String>) -> Self {
        Self {
            item_id: MODIFIER_ITEM_ID.to_string(),
            qty: 1,
            note: Some(note.into()),
        }
    }

    pub fn is_modifier(&self) -> bool {
        self.item_id == MODIFIER_ITEM_ID
    }

    /// Price of the line. Lines that no longer resolve against the menu cost nothing.
    pub fn subtotal(&self, menu: &Menu) -> u32 {
        menu.price_of(&self.item_id)
            .map(|price| price * u32::from(self.qty))
            .unwrap_or(0)
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone, Default)]
pub struct OrderRequest {
    /// Table number; required for dine-in, ignored for takeout.
    pub table: Option<u8>,
    pub takeout: bool,
    pub lines: Vec<OrderLine>,
    /// Free-text modifier such as "No onions" or "Takeout".
    pub modifier: Option<String>,
}

impl OrderRequest {
    pub fn dine_in(table: u8, lines: Vec<OrderLine>) -> Self {
        Self {
            table: Some(table),
            takeout: false,
            lines,
            modifier: None,
        }
    }

    pub fn takeout(lines: Vec<OrderLine>) -> Self {
        Self {
            table: None,
            takeout: true,
            lines,
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    /// True when the order is takeout, either by flag or by the "Takeout" modifier.
    pub fn is_takeout(&self) -> bool {
        self.takeout
            || self
                .modifier
                .as_deref()
                .is_some_and(|m| m.eq_ignore_ascii_case(TAKEOUT_MODIFIER))
    }

    /// Modifier text that should become an annotation line, if any.
    pub fn annotation(&self) -> Option<&str> {
        self.modifier
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty() && !m.eq_ignore_ascii_case(TAKEOUT_MODIFIER))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// `None` for takeout.
    pub table: Option<u8>,
    pub items: Vec<OrderLine>,
    pub status: OrderStatus,
    /// Local wall-clock time of creation, for display.
    pub timestamp: String,
    pub created_at: DateTime<Utc>,
    /// Local calendar day of creation.
    pub date: NaiveDate,
    pub modifier: String,
    pub is_takeout: bool,
    pub picked_up: bool,
    #[serde(default)]
    pub status_note: String,
}

impl Order {
    /// Total price: sum of `price * qty` over all lines.
    pub fn total(&self, menu: &Menu) -> u32 {
        self.items.iter().map(|line| line.subtotal(menu)).sum()
    }

    /// "Table 5" or "Takeout".
    pub fn table_label(&self) -> String {
        match self.table {
            Some(table) => format!("Table {}", table),
            None => "Takeout".to_string(),
        }
    }

    /// Modifier text, or the service type when no modifier was given.
    pub fn service_label(&self) -> &str {
        if !self.modifier.is_empty() {
            &self.modifier
        } else if self.is_takeout {
            "takeout"
        } else {
            "dine-in"
        }
    }

    /// Case-insensitive substring match on id, table label and modifier.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        let table = match self.table {
            Some(table) => format!("table {}", table),
            None => "takeout".to_string(),
        };
        self.id.0.to_lowercase().contains(&query)
            || table.contains(&query)
            || self.service_label().to_lowercase().contains(&query)
    }
}

use crate::engine::OrderError;
use crate::model::{Menu, OrderLine, OrderRequest, MAX_LINE_QTY};

/// Items collected for an order that has not been submitted yet.
///
/// Adding an item that is already in the draft merges the quantities, capped
/// at [`MAX_LINE_QTY`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderDraft {
    lines: Vec<OrderLine>,
}

impl OrderDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `qty` of a menu item, clamping the quantity to `1..=MAX_LINE_QTY`.
    ///
    /// # Errors
    /// `UnknownMenuItem` if the id is not in the catalog, `ItemUnavailable` if the
    /// item is currently marked unavailable.
    pub fn add(&mut self, menu: &Menu, item_id: &str, qty: u8) -> Result<(), OrderError> {
        let item = menu
            .get(item_id)
            .ok_or_else(|| OrderError::UnknownMenuItem(item_id.to_string()))?;
        if !item.available {
            return Err(OrderError::ItemUnavailable(item.name.clone()));
        }

        let qty = qty.clamp(1, MAX_LINE_QTY);
        match self.lines.iter_mut().find(|line| line.item_id == item_id) {
            Some(line) => line.qty = line.qty.saturating_add(qty).min(MAX_LINE_QTY),
            None => self.lines.push(OrderLine::new(item_id, qty)),
        }
        Ok(())
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// "2x Tapsilog, 1x Iced Tea"
    pub fn describe(&self, menu: &Menu) -> String {
        self.lines
            .iter()
            .map(|line| {
                let name = menu
                    .get(&line.item_id)
                    .map(|item| item.name.as_str())
                    .unwrap_or(&line.item_id);
                format!("{}x {}", line.qty, name)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Turns the draft into a creation payload, leaving the draft empty.
    pub fn take_request(&mut self, table: Option<u8>, modifier: Option<String>) -> OrderRequest {
        let mut request = OrderRequest {
            table,
            takeout: false,
            lines: std::mem::take(&mut self.lines),
            modifier: None,
        };
        request.modifier = modifier;
        request.takeout = request.is_takeout();
        request
    }
}

//! Read-only figures derived from the history.

use super::OrderBook;
use crate::model::OrderStatus;
use chrono::NaiveDate;
use serde::Serialize;

/// Counts over every order in the history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub delivered: usize,
    pub cancelled: usize,
}

/// Orders in the history created on one calendar day, and their revenue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub orders: usize,
    pub revenue: u32,
}

impl OrderBook {
    pub fn summary(&self) -> Summary {
        self.history()
            .into_iter()
            .fold(Summary::default(), |mut summary, order| {
                summary.total += 1;
                match order.status {
                    OrderStatus::Delivered => summary.delivered += 1,
                    OrderStatus::Cancelled => summary.cancelled += 1,
                    _ => {}
                }
                summary
            })
    }

    /// Cancelled orders count towards the revenue as well; the figure is the sum of
    /// order totals in the history, not takings.
    pub fn daily_summary(&self, date: NaiveDate) -> DailySummary {
        let todays: Vec<_> = self
            .history()
            .into_iter()
            .filter(|order| order.date == date)
            .collect();
        DailySummary {
            date,
            orders: todays.len(),
            revenue: todays.iter().map(|order| self.total(order)).sum(),
        }
    }

    /// Daily summary for the book clock's current day.
    pub fn today_summary(&self) -> DailySummary {
        self.daily_summary(self.now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::OrderBook;
    use crate::model::{Menu, OrderLine, OrderRequest};
    use chrono::{Local, TimeZone};

    #[test]
    fn test_summary_counts_history_only() {
        let now = Local.with_ymd_and_hms(2026, 3, 1, 18, 30, 0).unwrap();
        let mut book = OrderBook::new(Menu::default()).with_clock(move || now);

        let served = book
            .create_order(OrderRequest::dine_in(1, vec![OrderLine::new("kare_kare", 1)]))
            .unwrap();
        let dropped = book
            .create_order(OrderRequest::dine_in(2, vec![OrderLine::new("egg", 2)]))
            .unwrap();
        book.create_order(OrderRequest::dine_in(3, vec![OrderLine::new("egg", 1)]))
            .unwrap();

        book.process_next().unwrap();
        book.set_order_ready(&served.id).unwrap();
        book.deliver_order(&served.id).unwrap();
        book.cancel_order(&dropped.id).unwrap();

        let summary = book.summary();
        assert_eq!(summary.total, 2);
        assert_eq!(summary.delivered, 1);
        assert_eq!(summary.cancelled, 1);

        let today = book.today_summary();
        assert_eq!(today.orders, 2);
        assert_eq!(today.revenue, 180 + 30);

        let other_day = book.daily_summary(now.date_naive().pred_opt().unwrap());
        assert_eq!(other_day.orders, 0);
        assert_eq!(other_day.revenue, 0);
    }
}

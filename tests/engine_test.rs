use chrono::{DateTime, Duration, Local, TimeZone};
use order_desk::engine::{OrderBook, OrderError, UndoRecord};
use order_desk::model::{Menu, Order, OrderId, OrderLine, OrderRequest, OrderStatus};
use order_desk::snapshot::Snapshot;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

fn service_start() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 5, 12, 11, 0, 0).unwrap()
}

/// Book whose clock advances one second per reading.
fn ticking_book() -> OrderBook {
    let tick = Arc::new(AtomicI64::new(0));
    let start = service_start();
    OrderBook::new(Menu::default())
        .with_clock(move || start + Duration::seconds(tick.fetch_add(1, Ordering::SeqCst)))
}

fn dine_in(table: u8, item: &str, qty: u8) -> OrderRequest {
    OrderRequest::dine_in(table, vec![OrderLine::new(item, qty)])
}

fn takeout(item: &str, qty: u8) -> OrderRequest {
    OrderRequest::takeout(vec![OrderLine::new(item, qty)])
}

fn ids(orders: Vec<&Order>) -> Vec<OrderId> {
    orders.into_iter().map(|order| order.id.clone()).collect()
}

fn queue_ids(book: &OrderBook) -> Vec<OrderId> {
    book.queue().iter().cloned().collect()
}

/// Checks the structural invariants that must hold after every operation.
fn assert_consistent(book: &OrderBook) {
    let active = book.active_orders();
    assert!(
        active.windows(2).all(|w| w[0].created_at <= w[1].created_at),
        "active orders out of creation order"
    );
    for order in book.queued_orders() {
        assert_eq!(order.status, OrderStatus::Received, "queued order {} not Received", order.id);
    }
    for order in active.iter().chain(book.history().iter()) {
        assert!(!order.is_takeout || order.table.is_none());
        assert!(!order.picked_up || (order.is_takeout && order.status == OrderStatus::Delivered));
    }
    assert_eq!(book.queue().len(), book.queued_orders().len(), "dangling queue entry");
    let unique: HashSet<_> = book.queue().iter().collect();
    assert_eq!(unique.len(), book.queue().len(), "order queued twice");
}

/// Undoes everything left on the stack, checking the invariants after each step.
fn unwind(book: &mut OrderBook) -> Vec<&'static str> {
    let mut kinds = Vec::new();
    while let Ok(record) = book.undo_last() {
        kinds.push(record.kind());
        assert_consistent(book);
    }
    kinds
}

#[test]
fn test_dine_in_happy_path() {
    let mut book = ticking_book();

    // table 5, 2x tapsilog
    let order = book.create_order(dine_in(5, "tapsilog", 2)).unwrap();
    assert_eq!(book.total(&order), 190);
    assert_eq!(order.status, OrderStatus::Received);
    assert_eq!(order.table, Some(5));
    assert_eq!(order.date, service_start().date_naive());
    assert_eq!(order.timestamp, "11:00:00 AM");
    assert_eq!(ids(book.active_orders()), vec![order.id.clone()]);
    assert_eq!(queue_ids(&book), vec![order.id.clone()]);
    assert_consistent(&book);

    let preparing = book.process_next().unwrap();
    assert_eq!(preparing.status, OrderStatus::Preparing);
    assert_eq!(preparing.status_note, "Kitchen started preparing");
    assert!(book.queue().is_empty());
    assert_consistent(&book);

    let ready = book.complete_preparation(&order.id).unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);
    assert_eq!(ids(book.active_orders()), vec![order.id.clone()]);
    assert_consistent(&book);

    let delivered = book.deliver_order(&order.id).unwrap();
    assert_eq!(delivered.status, OrderStatus::Delivered);
    assert_eq!(delivered.status_note, "Delivered to table");
    assert!(book.active_orders().is_empty());
    assert_eq!(ids(book.history()), vec![order.id]);
    assert_consistent(&book);
}

#[test]
fn test_takeout_pickup_flow() {
    let mut book = ticking_book();
    let order = book.create_order(takeout("pork_bbq_platter", 1)).unwrap();
    assert!(order.is_takeout);
    assert_eq!(order.table, None);

    book.process_next().unwrap();
    let ready = book.set_order_ready(&order.id).unwrap();
    assert_eq!(ready.status, OrderStatus::Ready);
    assert!(!ready.picked_up);
    assert!(book.active_orders().is_empty());
    assert_eq!(ids(book.history()), vec![order.id.clone()]);

    let picked = book.confirm_pickup(&order.id).unwrap();
    assert_eq!(picked.status, OrderStatus::Delivered);
    assert!(picked.picked_up);
    assert_eq!(picked.status_note, "Picked up by customer");
    assert_consistent(&book);

    // valid only once
    assert!(matches!(
        book.confirm_pickup(&order.id),
        Err(OrderError::InvalidTransition { .. })
    ));
}

#[test]
fn test_kitchen_queue_is_fifo() {
    let mut book = ticking_book();
    let first = book.create_order(dine_in(1, "carbonara", 1)).unwrap();
    let second = book.create_order(takeout("softdrinks", 3)).unwrap();
    let third = book.create_order(dine_in(2, "kare_kare", 1)).unwrap();

    assert_eq!(book.process_next().unwrap().id, first.id);
    assert_eq!(book.process_next().unwrap().id, second.id);
    assert_eq!(book.process_next().unwrap().id, third.id);
    assert_eq!(book.process_next(), Err(OrderError::EmptyQueue));
    assert_eq!(ids(book.active_orders()), vec![first.id, second.id, third.id]);
}

#[test]
fn test_undo_create_restores_prior_state() {
    let mut book = ticking_book();
    let kept = book.create_order(dine_in(3, "egg", 1)).unwrap();
    let before = book.snapshot();

    let order = book.create_order(dine_in(4, "beef_steak", 1)).unwrap();
    let record = book.undo_last().unwrap();

    assert_eq!(record, UndoRecord::CreateOrder(order.id.clone()));
    assert!(book.get(&order.id).is_none());
    assert_eq!(book.snapshot(), before);
    assert_eq!(ids(book.active_orders()), vec![kept.id]);
    assert_eq!(book.undo_depth(), 1);
}

#[test]
fn test_undo_cancel_requeues_as_received() {
    let mut book = ticking_book();
    let first = book.create_order(dine_in(1, "adobo", 1)).unwrap();
    let second = book.create_order(dine_in(2, "adobo", 1)).unwrap();
    book.process_next().unwrap();
    book.complete_preparation(&first.id).unwrap();

    let cancelled = book.cancel_order(&first.id).unwrap();
    assert_eq!(cancelled.status_note, "Cancelled by staff");
    assert_eq!(book.summary().cancelled, 1);

    book.undo_last().unwrap();
    let restored = book.get(&first.id).unwrap();
    assert_eq!(restored.status, OrderStatus::Received);
    assert!(restored.status_note.is_empty());
    assert!(book.history().is_empty());
    // back of the queue, but first in the display order
    assert_eq!(queue_ids(&book), vec![second.id.clone(), first.id.clone()]);
    assert_eq!(ids(book.active_orders()), vec![first.id, second.id]);
    assert_consistent(&book);
}

#[test]
fn test_undo_unwinds_in_reverse_order() {
    let mut book = ticking_book();
    let order = book.create_order(dine_in(8, "pesto_pasta", 2)).unwrap();
    book.process_next().unwrap();
    book.set_order_ready(&order.id).unwrap();
    book.deliver_order(&order.id).unwrap();

    let kinds: Vec<_> = std::iter::from_fn(|| book.undo_last().ok())
        .map(|record| record.kind())
        .collect();
    assert_eq!(kinds, vec!["deliver", "set_ready", "process_next", "create"]);
    assert!(book.is_empty());
    assert!(book.queue().is_empty());
    assert_eq!(book.undo_last(), Err(OrderError::NothingToUndo));
}

#[test]
fn test_undo_across_cancel_while_preparing() {
    let mut book = ticking_book();
    let first = book.create_order(dine_in(1, "longsilog", 1)).unwrap();
    let second = book.create_order(dine_in(2, "longsilog", 1)).unwrap();
    book.process_next().unwrap();
    book.cancel_order(&first.id).unwrap();

    book.undo_last().unwrap();
    assert_consistent(&book);
    book.undo_last().unwrap();
    assert_consistent(&book);

    // back where it was before the kitchen picked it up
    assert_eq!(queue_ids(&book), vec![first.id.clone(), second.id.clone()]);
    assert_eq!(book.process_next().unwrap().id, first.id);
    assert_eq!(book.process_next().unwrap().id, second.id);
    assert_eq!(book.process_next(), Err(OrderError::EmptyQueue));
    assert_consistent(&book);

    assert_eq!(
        unwind(&mut book),
        vec!["process_next", "process_next", "create", "create"]
    );
    assert!(book.is_empty());
    assert!(book.queue().is_empty());
}

#[test]
fn test_undo_across_cancel_after_ready() {
    let mut book = ticking_book();
    let order = book.create_order(dine_in(9, "sinigang_baboy", 1)).unwrap();
    book.process_next().unwrap();
    book.set_order_ready(&order.id).unwrap();
    book.cancel_order(&order.id).unwrap();

    book.undo_last().unwrap();
    assert_consistent(&book);
    let record = book.undo_last().unwrap();
    assert_eq!(record.kind(), "set_ready");
    assert_consistent(&book);
    assert_eq!(book.get(&order.id).unwrap().status, OrderStatus::Received);
    assert_eq!(queue_ids(&book), vec![order.id.clone()]);

    // the kitchen can still take it
    let mut resumed = ticking_book();
    resumed.restore(book.snapshot());
    assert_eq!(resumed.process_next().unwrap().id, order.id);
    assert_consistent(&resumed);

    assert_eq!(unwind(&mut book), vec!["process_next", "create"]);
    assert!(book.is_empty());
    assert!(book.queue().is_empty());
    assert!(book.history().is_empty());
}

#[test]
fn test_restore_drops_queued_orders_that_are_not_received() {
    let mut book = ticking_book();
    let cooking = book.create_order(dine_in(4, "chicken_soup", 1)).unwrap();
    let waiting = book.create_order(dine_in(5, "chicken_soup", 1)).unwrap();
    book.process_next().unwrap();

    let mut stale = book.snapshot();
    stale.kitchen_queue.insert(0, cooking.id.clone());

    let mut restored = ticking_book();
    restored.restore(stale);
    assert_eq!(queue_ids(&restored), vec![waiting.id.clone()]);
    assert_eq!(restored.get(&cooking.id).unwrap().status, OrderStatus::Preparing);
    assert_consistent(&restored);
    assert_eq!(restored.process_next().unwrap().id, waiting.id);
}

#[test]
fn test_rejections_leave_state_untouched() {
    let mut book = ticking_book();
    let order = book.create_order(dine_in(6, "caesar_salad", 1)).unwrap();
    let before = book.snapshot();
    let depth = book.undo_depth();
    let ghost = OrderId::from("ORD-none-0");

    assert_eq!(book.cancel_order(&ghost), Err(OrderError::UnknownOrder(ghost.clone())));
    assert!(book.deliver_order(&order.id).is_err());
    assert!(book.confirm_pickup(&order.id).is_err());
    assert!(book.set_order_ready(&order.id).is_err());
    assert!(book.create_order(OrderRequest::dine_in(6, vec![])).is_err());

    assert_eq!(book.snapshot(), before);
    assert_eq!(book.undo_depth(), depth);

    let mut empty = ticking_book();
    assert_eq!(empty.process_next(), Err(OrderError::EmptyQueue));
    assert_eq!(empty.undo_last(), Err(OrderError::NothingToUndo));
    assert!(empty.is_empty());
    assert_eq!(empty.undo_depth(), 0);
}

#[test]
fn test_history_search() {
    let mut book = ticking_book();
    let at_table = book.create_order(dine_in(12, "chicken_soup", 1)).unwrap();
    let to_go = book
        .create_order(takeout("fresh_lemonade", 2).with_modifier("Less sugar"))
        .unwrap();
    book.cancel_order(&at_table.id).unwrap();
    book.cancel_order(&to_go.id).unwrap();

    assert_eq!(book.search_history("").len(), 2);
    assert_eq!(ids(book.search_history("table 12")), vec![at_table.id.clone()]);
    assert_eq!(ids(book.search_history("TAKEOUT")), vec![to_go.id.clone()]);
    assert_eq!(ids(book.search_history(&to_go.id.0)), vec![to_go.id.clone()]);
    assert!(book.search_history("no such order").is_empty());
    assert_eq!(book.history_by_status(OrderStatus::Cancelled).len(), 2);
}

#[test]
fn test_restore_round_trip_through_json() {
    let mut book = ticking_book();
    let served = book.create_order(dine_in(2, "spag_bolo", 1)).unwrap();
    let waiting = book.create_order(takeout("tocilog", 2)).unwrap();
    book.process_next().unwrap();
    book.set_order_ready(&served.id).unwrap();
    book.toggle_item_availability("mango_float").unwrap();

    let doc = book.snapshot().to_json().unwrap();
    let mut restored = OrderBook::new(Menu::default());
    restored.restore(Snapshot::from_json(&doc).unwrap());

    assert_eq!(restored.snapshot(), book.snapshot());
    assert_eq!(ids(restored.active_orders()), vec![served.id.clone(), waiting.id.clone()]);
    assert_eq!(queue_ids(&restored), vec![waiting.id]);
    assert!(!restored.menu().get("mango_float").unwrap().available);
    assert_eq!(restored.undo_depth(), 0);
    assert_consistent(&restored);
}

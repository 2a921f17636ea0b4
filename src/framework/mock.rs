//! # Mock Desk
//!
//! Utilities for testing [`DeskClient`] callers without spawning the actor.
//!
//! Use [`create_mock_client`] to get a client and the receiving end of its channel,
//! then helpers like [`expect_create`] or [`expect_action`] to assert what was sent
//! and answer it. [`MockDesk`] offers a queued-expectation API instead.

use crate::clients::DeskClient;
use crate::engine::UndoRecord;
use crate::framework::{
    DeskHandle, DeskQuery, DeskRequest, FrameworkError, OrderAction, QueryResult, Response,
};
use crate::model::{Order, OrderId, OrderRequest};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// One queued answer. Requests are matched strictly in order.
enum Expectation {
    Create(Result<Order, FrameworkError>),
    Get(Result<Option<Order>, FrameworkError>),
    Action {
        id: OrderId,
        action: OrderAction,
        response: Result<Order, FrameworkError>,
    },
    ProcessNext(Result<Order, FrameworkError>),
    Undo(Result<UndoRecord, FrameworkError>),
    Query(Result<QueryResult, FrameworkError>),
}

type Expectations = Arc<Mutex<VecDeque<Expectation>>>;

fn lock(expectations: &Expectations) -> MutexGuard<'_, VecDeque<Expectation>> {
    expectations.lock().unwrap_or_else(|e| e.into_inner())
}

/// A mock desk with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockDesk::new();
/// mock.expect_create().return_ok(order.clone());
/// mock.expect_action(order.id.clone(), OrderAction::Cancel).return_ok(cancelled);
///
/// let client = mock.client();
/// // Use client in tests...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockDesk {
    client: DeskClient,
    expectations: Expectations,
    _handle: tokio::task::JoinHandle<()>,
}

impl MockDesk {
    /// Creates a new mock with no expectations.
    ///
    /// # Panics
    /// The background task panics on a request that does not match the next
    /// expectation; the caller then sees an `ActorDropped` communication error.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<DeskRequest>(100);
        let expectations: Expectations = Arc::new(Mutex::new(VecDeque::new()));
        let queued = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = lock(&queued).pop_front();

                match (request, expectation) {
                    (DeskRequest::Create { respond_to, .. }, Some(Expectation::Create(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (DeskRequest::Get { respond_to, .. }, Some(Expectation::Get(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        DeskRequest::Action {
                            id,
                            action,
                            respond_to,
                        },
                        Some(Expectation::Action {
                            id: expected_id,
                            action: expected_action,
                            response,
                        }),
                    ) => {
                        assert_eq!(id, expected_id, "action sent to unexpected order");
                        assert_eq!(action, expected_action, "unexpected action");
                        let _ = respond_to.send(response);
                    }
                    (DeskRequest::ProcessNext { respond_to }, Some(Expectation::ProcessNext(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (DeskRequest::Undo { respond_to }, Some(Expectation::Undo(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (DeskRequest::Query { respond_to, .. }, Some(Expectation::Query(response))) => {
                        let _ = respond_to.send(response);
                    }
                    (request, _) => {
                        panic!("Unexpected request or expectation mismatch: {:?}", request);
                    }
                }
            }
        });

        Self {
            client: DeskClient::new(DeskHandle::new(sender)),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> DeskClient {
        self.client.clone()
    }

    pub fn expect_create(&self) -> ExpectationBuilder<Order> {
        self.builder(Expectation::Create)
    }

    pub fn expect_get(&self) -> ExpectationBuilder<Option<Order>> {
        self.builder(Expectation::Get)
    }

    /// Expects `action` on order `id`.
    pub fn expect_action(&self, id: OrderId, action: OrderAction) -> ExpectationBuilder<Order> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(move |response| Expectation::Action {
                id,
                action,
                response,
            }),
        }
    }

    pub fn expect_process_next(&self) -> ExpectationBuilder<Order> {
        self.builder(Expectation::ProcessNext)
    }

    pub fn expect_undo(&self) -> ExpectationBuilder<UndoRecord> {
        self.builder(Expectation::Undo)
    }

    pub fn expect_query(&self) -> ExpectationBuilder<QueryResult> {
        self.builder(Expectation::Query)
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = lock(&self.expectations).len();
        if remaining > 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn builder<T: 'static>(
        &self,
        wrap: fn(Result<T, FrameworkError>) -> Expectation,
    ) -> ExpectationBuilder<T> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }
}

impl Default for MockDesk {
    fn default() -> Self {
        Self::new()
    }
}

/// Queues the answer for one expected request.
pub struct ExpectationBuilder<T> {
    expectations: Expectations,
    wrap: Box<dyn FnOnce(Result<T, FrameworkError>) -> Expectation + Send>,
}

impl<T> ExpectationBuilder<T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        lock(&self.expectations).push_back((self.wrap)(Ok(value)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        lock(&self.expectations).push_back((self.wrap)(Err(error)));
    }
}

// =============================================================================
// CHANNEL HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// Lets a test play the actor: inspect each request as it arrives and answer it
/// (success, rejection, or dropping the responder) deterministically.
pub fn create_mock_client(buffer_size: usize) -> (DeskClient, mpsc::Receiver<DeskRequest>) {
    let (sender, receiver) = mpsc::channel(buffer_size.max(1));
    (DeskClient::new(DeskHandle::new(sender)), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create(
    receiver: &mut mpsc::Receiver<DeskRequest>,
) -> Option<(OrderRequest, Response<Order>)> {
    match receiver.recv().await {
        Some(DeskRequest::Create {
            request,
            respond_to,
        }) => Some((request, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Get request
pub async fn expect_get(
    receiver: &mut mpsc::Receiver<DeskRequest>,
) -> Option<(OrderId, Response<Option<Order>>)> {
    match receiver.recv().await {
        Some(DeskRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action(
    receiver: &mut mpsc::Receiver<DeskRequest>,
) -> Option<(OrderId, OrderAction, Response<Order>)> {
    match receiver.recv().await {
        Some(DeskRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Query request
pub async fn expect_query(
    receiver: &mut mpsc::Receiver<DeskRequest>,
) -> Option<(DeskQuery, Response<QueryResult>)> {
    match receiver.recv().await {
        Some(DeskRequest::Query { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

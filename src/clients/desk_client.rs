use crate::engine::{DailySummary, OrderError, Summary, UndoRecord};
use crate::framework::{
    DeskHandle, DeskQuery, DeskRequest, FrameworkError, OrderAction, QueryResult,
};
use crate::model::{Menu, Order, OrderId, OrderRequest, OrderStatus};
use chrono::NaiveDate;
use tracing::{debug, info, instrument};

/// Client for interacting with the order desk actor.
///
/// Cheap to clone; every clone talks to the same actor. Engine rejections come back
/// unchanged, channel failures as [`OrderError::ActorCommunicationError`].
#[derive(Clone, Debug)]
pub struct DeskClient {
    inner: DeskHandle,
}

impl DeskClient {
    pub fn new(inner: DeskHandle) -> Self {
        Self { inner }
    }

    /// Map framework errors to the order error type.
    fn map_error(e: FrameworkError) -> OrderError {
        match e {
            FrameworkError::Rejected(e) => e,
            other => OrderError::ActorCommunicationError(other.to_string()),
        }
    }

    // --- Lifecycle ---

    #[instrument(skip(self, request))]
    pub async fn create_order(&self, request: OrderRequest) -> Result<Order, OrderError> {
        debug!(?request, "create_order called");
        info!("Sending create_order to actor");
        self.inner
            .request(|respond_to| DeskRequest::Create {
                request,
                respond_to,
            })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn cancel_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.perform_action(id, OrderAction::Cancel).await
    }

    /// Starts preparing the order at the front of the kitchen queue.
    #[instrument(skip(self))]
    pub async fn process_next_kitchen_order(&self) -> Result<Order, OrderError> {
        self.inner
            .request(|respond_to| DeskRequest::ProcessNext { respond_to })
            .await
            .map_err(Self::map_error)
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn set_order_ready(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.perform_action(id, OrderAction::SetReady).await
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn deliver_order(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.perform_action(id, OrderAction::Deliver).await
    }

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn confirm_pickup(&self, id: &OrderId) -> Result<Order, OrderError> {
        self.perform_action(id, OrderAction::ConfirmPickup).await
    }

    /// Reverses the most recent mutating operation.
    #[instrument(skip(self))]
    pub async fn undo_last_action(&self) -> Result<UndoRecord, OrderError> {
        self.inner
            .request(|respond_to| DeskRequest::Undo { respond_to })
            .await
            .map_err(Self::map_error)
    }

    /// Returns the new availability flag.
    #[instrument(skip(self))]
    pub async fn toggle_item_availability(&self, item_id: &str) -> Result<bool, OrderError> {
        let item_id = item_id.to_string();
        self.inner
            .request(|respond_to| DeskRequest::ToggleAvailability {
                item_id,
                respond_to,
            })
            .await
            .map_err(Self::map_error)
    }

    async fn perform_action(&self, id: &OrderId, action: OrderAction) -> Result<Order, OrderError> {
        let id = id.clone();
        self.inner
            .request(|respond_to| DeskRequest::Action {
                id,
                action,
                respond_to,
            })
            .await
            .map_err(Self::map_error)
    }

    // --- Reads ---

    #[instrument(skip(self, id), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        let id = id.clone();
        self.inner
            .request(|respond_to| DeskRequest::Get { id, respond_to })
            .await
            .map_err(Self::map_error)
    }

    /// Active orders, ascending by creation time.
    pub async fn active_orders(&self) -> Result<Vec<Order>, OrderError> {
        self.orders(DeskQuery::ActiveOrders).await
    }

    /// Orders waiting for the kitchen, front first.
    pub async fn kitchen_queue(&self) -> Result<Vec<Order>, OrderError> {
        self.orders(DeskQuery::KitchenQueue).await
    }

    pub async fn history(&self) -> Result<Vec<Order>, OrderError> {
        self.orders(DeskQuery::History).await
    }

    #[instrument(skip(self))]
    pub async fn search_history(&self, query: &str) -> Result<Vec<Order>, OrderError> {
        self.orders(DeskQuery::SearchHistory(query.to_string())).await
    }

    pub async fn history_by_status(&self, status: OrderStatus) -> Result<Vec<Order>, OrderError> {
        self.orders(DeskQuery::HistoryByStatus(status)).await
    }

    pub async fn summary(&self) -> Result<Summary, OrderError> {
        match self.query(DeskQuery::Summary).await? {
            QueryResult::Summary(summary) => Ok(summary),
            other => Err(unexpected(other)),
        }
    }

    /// Daily summary for `date`, or for today when `None`.
    pub async fn daily_summary(&self, date: Option<NaiveDate>) -> Result<DailySummary, OrderError> {
        match self.query(DeskQuery::DailySummary(date)).await? {
            QueryResult::DailySummary(summary) => Ok(summary),
            other => Err(unexpected(other)),
        }
    }

    pub async fn menu(&self) -> Result<Menu, OrderError> {
        match self.query(DeskQuery::Menu).await? {
            QueryResult::Menu(menu) => Ok(menu),
            other => Err(unexpected(other)),
        }
    }

    pub async fn table_options(&self) -> Result<Vec<u8>, OrderError> {
        match self.query(DeskQuery::Tables).await? {
            QueryResult::Tables(tables) => Ok(tables),
            other => Err(unexpected(other)),
        }
    }

    pub async fn undo_depth(&self) -> Result<usize, OrderError> {
        match self.query(DeskQuery::UndoDepth).await? {
            QueryResult::UndoDepth(depth) => Ok(depth),
            other => Err(unexpected(other)),
        }
    }

    async fn orders(&self, query: DeskQuery) -> Result<Vec<Order>, OrderError> {
        match self.query(query).await? {
            QueryResult::Orders(orders) => Ok(orders),
            other => Err(unexpected(other)),
        }
    }

    async fn query(&self, query: DeskQuery) -> Result<QueryResult, OrderError> {
        self.inner
            .request(|respond_to| DeskRequest::Query { query, respond_to })
            .await
            .map_err(Self::map_error)
    }
}

fn unexpected(reply: QueryResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected reply: {:?}", reply))
}

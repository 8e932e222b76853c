//! Stored orders and their history keys
use super::error::{OrderError, TransitionError};
use super::inventory::LineItem;
use super::record::TimeStamp;
use super::status::OrderStatus;
use chrono::Utc;

pub const ORDERS_TREE: &str = "orders";

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Order {
    #[n(0)]
    pub order_id: String, // uuid7, bech32m under the "order_" prefix
    #[n(1)]
    pub line_items: Vec<LineItem>,
    #[n(2)]
    status_code: String, // stable code, see [`OrderStatus::code`]
    #[n(3)]
    pub revision: u64,
    #[n(4)]
    pub placed_at: TimeStamp<Utc>,
}

impl Order {
    /// Orders always enter the lifecycle as `PaymentCompleted`.
    pub fn new(order_id: String, line_items: Vec<LineItem>) -> Self {
        Self {
            order_id,
            line_items,
            status_code: OrderStatus::PaymentCompleted.code().to_string(),
            revision: 0,
            placed_at: TimeStamp::new(),
        }
    }

    /// Statuses are kept as codes so that a record written by a newer schema
    /// loads and reports `UnknownStatus` rather than failing to decode.
    pub fn status(&self) -> Result<OrderStatus, TransitionError> {
        OrderStatus::from_code(&self.status_code)
    }

    pub fn status_code(&self) -> &str {
        &self.status_code
    }

    pub(crate) fn advance(&mut self, to: OrderStatus) {
        self.status_code = to.code().to_string();
        self.revision += 1;
    }

    pub fn encode(&self) -> Result<Vec<u8>, OrderError> {
        Ok(minicbor::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, OrderError> {
        Ok(minicbor::decode(bytes)?)
    }

    /// Key of the history entry written by the transition that produced
    /// `revision`. Zero padding keeps a prefix scan in revision order.
    pub fn history_key(order_id: &str, revision: u64) -> String {
        format!("{order_id}/{revision:020}")
    }

    pub fn history_prefix(order_id: &str) -> String {
        format!("{order_id}/")
    }
}

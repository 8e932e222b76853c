//! Service layer: serialised, atomic order transitions over sled
use super::authority::TransitionAuthority;
use super::config::ServiceConfig;
use super::effects::{self, SideEffects};
use super::error::{OrderError, TransitionError};
use super::inventory::{LineItem, StockLedger};
use super::locks::OrderLocks;
use super::order::{ORDERS_TREE, Order};
use super::record::{TimeStamp, TransitionRecord};
use super::status::OrderStatus;
use super::utils;
use sled::Transactional;
use sled::transaction::{ConflictableTransactionError, TransactionResult, abort};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub const HISTORY_TREE: &str = "history";

/// Result of an accepted transition, after it has been committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub order: Order,
    pub record: TransitionRecord,
    pub record_hash: String, // sha256 of the record's CBOR encoding
    pub effects: SideEffects,
}

pub struct OrderService {
    instance: Arc<sled::Db>,
    orders: sled::Tree,
    history: sled::Tree,
    stock: StockLedger,
    locks: OrderLocks,
}

impl OrderService {
    pub fn new(instance: Arc<sled::Db>) -> Result<Self, OrderError> {
        let orders = instance.open_tree(ORDERS_TREE)?;
        let history = instance.open_tree(HISTORY_TREE)?;
        let stock = StockLedger::open(&instance)?;

        Ok(Self {
            instance,
            orders,
            history,
            stock,
            locks: OrderLocks::new(),
        })
    }

    pub fn open(config: &ServiceConfig) -> Result<Self, OrderError> {
        let db = config.open_db()?;
        info!(path = %config.db_path.display(), temporary = config.temporary, "opened order store");
        Self::new(Arc::new(db))
    }

    pub fn set_stock(&self, sku: &str, quantity: u64) -> Result<(), OrderError> {
        self.stock.set_stock(sku, quantity)
    }

    pub fn stock_of(&self, sku: &str) -> Result<u64, OrderError> {
        self.stock.stock_of(sku)
    }

    /// Create an order at `PaymentCompleted`, taking its stock in the same
    /// transaction. Either every line item is reserved or nothing changes.
    pub fn place_order(&self, line_items: Vec<LineItem>, actor: &str) -> Result<Order, OrderError> {
        if line_items.is_empty() {
            return Err(OrderError::EmptyOrder);
        }
        if let Some(item) = line_items.iter().find(|item| item.quantity == 0) {
            return Err(OrderError::InvalidLineItem {
                sku: item.sku.clone(),
            });
        }

        let order = Order::new(utils::new_order_id()?, line_items);
        let encoded = order.encode()?;

        let result: TransactionResult<(), OrderError> = (&self.orders, self.stock.tree())
            .transaction(|(orders, stock)| {
                StockLedger::reserve_in(stock, &order.line_items)?;
                orders.insert(order.order_id.as_bytes(), encoded.clone())?;
                Ok(())
            });
        result?;

        info!(
            order_id = %order.order_id,
            actor,
            items = order.line_items.len(),
            status = OrderStatus::PaymentCompleted.label(),
            "order placed"
        );

        Ok(order)
    }

    pub fn load_order(&self, order_id: &str) -> Result<Order, OrderError> {
        match self.orders.get(order_id.as_bytes())? {
            Some(raw) => Order::decode(&raw),
            None => Err(OrderError::NotFound(order_id.to_string())),
        }
    }

    /// Statuses an operator may choose next for this order.
    pub fn allowed_next(&self, order_id: &str) -> Result<Vec<OrderStatus>, OrderError> {
        let order = self.load_order(order_id)?;
        let current = self.current_status(&order)?;

        Ok(TransitionAuthority::allowed_from(current).to_vec())
    }

    /// Move an order to `requested`.
    ///
    /// The whole read, validate, persist sequence runs under the order's lock.
    /// The status write, the history record and any stock restoration commit
    /// in one sled transaction, which also refuses to overwrite a revision it
    /// did not read.
    pub fn transition(
        &self,
        order_id: &str,
        requested: OrderStatus,
        actor: &str,
    ) -> Result<TransitionOutcome, OrderError> {
        self.locks
            .with_order(order_id, || self.transition_locked(order_id, requested, actor))
    }

    fn transition_locked(
        &self,
        order_id: &str,
        requested: OrderStatus,
        actor: &str,
    ) -> Result<TransitionOutcome, OrderError> {
        let order = self.load_order(order_id)?;
        let current = self.current_status(&order)?;

        if effects::is_terminal(current) {
            debug!(order_id, status = current.label(), "order is closed, rejecting early");
            return Err(TransitionError::illegal(current, requested, &[]).into());
        }

        let accepted = match effects::resolve(current, requested) {
            Ok(accepted) => accepted,
            Err(err) => {
                warn!(
                    order_id,
                    actor,
                    from = current.label(),
                    to = requested.label(),
                    "illegal transition requested"
                );
                return Err(err.into());
            }
        };

        let mut updated = order.clone();
        updated.advance(accepted.to);

        let record = TransitionRecord::new(
            order_id.to_string(),
            accepted.from,
            accepted.to,
            TimeStamp::new(),
            actor.to_string(),
            updated.revision,
        );
        let (record_hash, record_cbor) = record.build()?;
        self.commit(&order, &updated, &record_cbor, accepted.effects)?;

        info!(
            order_id,
            actor,
            from = accepted.from.label(),
            to = accepted.to.label(),
            revision = updated.revision,
            restore_inventory = accepted.effects.restore_inventory,
            record_hash = %record_hash,
            "order transitioned"
        );

        Ok(TransitionOutcome {
            order: updated,
            record,
            record_hash,
            effects: accepted.effects,
        })
    }

    /// Write `updated` and its history record, restoring stock when
    /// `effects` asks for it. Aborts with `Conflict` unless the stored order
    /// is still at the revision of `read`.
    fn commit(
        &self,
        read: &Order,
        updated: &Order,
        record_cbor: &[u8],
        effects: SideEffects,
    ) -> Result<(), OrderError> {
        let order_id = read.order_id.as_str();
        let order_cbor = updated.encode()?;
        let history_key = Order::history_key(order_id, updated.revision);

        let result: TransactionResult<(), OrderError> =
            (&self.orders, &self.history, self.stock.tree()).transaction(
                |(orders, history, stock)| {
                    let stored = match orders.get(order_id.as_bytes())? {
                        Some(raw) => {
                            Order::decode(&raw).map_err(ConflictableTransactionError::Abort)?
                        }
                        None => return abort(OrderError::NotFound(order_id.to_string())),
                    };
                    if stored.revision != read.revision {
                        return abort(OrderError::Conflict(order_id.to_string()));
                    }

                    orders.insert(order_id.as_bytes(), order_cbor.clone())?;
                    history.insert(history_key.as_bytes(), record_cbor)?;

                    if effects.restore_inventory {
                        StockLedger::restore_in(stock, &updated.line_items)?;
                    }

                    Ok(())
                },
            );

        Ok(result?)
    }

    /// Accepted transitions for an order, oldest first.
    pub fn history(&self, order_id: &str) -> Result<Vec<TransitionRecord>, OrderError> {
        self.history
            .scan_prefix(Order::history_prefix(order_id).as_bytes())
            .map(|entry| -> Result<TransitionRecord, OrderError> {
                let (_, raw) = entry?;
                Ok(minicbor::decode(&raw)?)
            })
            .collect()
    }

    pub fn flush(&self) -> Result<usize, OrderError> {
        Ok(self.instance.flush()?)
    }

    fn current_status(&self, order: &Order) -> Result<OrderStatus, OrderError> {
        order.status().map_err(|err| {
            error!(
                order_id = %order.order_id,
                status_code = order.status_code(),
                "stored order carries a status this build does not know"
            );
            OrderError::from(err)
        })
    }
}

//! Per-SKU stock counters kept in a sled tree
use super::error::OrderError;
use sled::transaction::{ConflictableTransactionResult, TransactionalTree, abort};

pub const STOCK_TREE: &str = "stock";

#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct LineItem {
    #[n(0)]
    pub sku: String,
    #[n(1)]
    pub quantity: u64,
}

impl LineItem {
    pub fn new(sku: impl Into<String>, quantity: u64) -> Self {
        Self {
            sku: sku.into(),
            quantity,
        }
    }
}

/// Stock levels are stored as big-endian u64 keyed by SKU.
#[derive(Debug, Clone)]
pub struct StockLedger {
    tree: sled::Tree,
}

impl StockLedger {
    pub fn open(db: &sled::Db) -> Result<Self, OrderError> {
        Ok(Self {
            tree: db.open_tree(STOCK_TREE)?,
        })
    }

    pub fn tree(&self) -> &sled::Tree {
        &self.tree
    }

    pub fn set_stock(&self, sku: &str, quantity: u64) -> Result<(), OrderError> {
        self.tree.insert(sku.as_bytes(), quantity.to_be_bytes().to_vec())?;
        Ok(())
    }

    /// Unknown SKUs have no stock.
    pub fn stock_of(&self, sku: &str) -> Result<u64, OrderError> {
        match self.tree.get(sku.as_bytes())? {
            Some(raw) => decode_quantity(sku, &raw),
            None => Ok(0),
        }
    }

    /// Take stock for every item, aborting the whole transaction on the
    /// first shortfall.
    pub(crate) fn reserve_in(
        tree: &TransactionalTree,
        items: &[LineItem],
    ) -> ConflictableTransactionResult<(), OrderError> {
        for item in items {
            let available = match tree.get(item.sku.as_bytes())? {
                Some(raw) => match decode_quantity(&item.sku, &raw) {
                    Ok(quantity) => quantity,
                    Err(err) => return abort(err),
                },
                None => 0,
            };

            if available < item.quantity {
                return abort(OrderError::InsufficientStock {
                    sku: item.sku.clone(),
                    requested: item.quantity,
                    available,
                });
            }

            let remaining = available - item.quantity;
            tree.insert(item.sku.as_bytes(), remaining.to_be_bytes().to_vec())?;
        }

        Ok(())
    }

    /// Put the stock of every item back.
    pub(crate) fn restore_in(
        tree: &TransactionalTree,
        items: &[LineItem],
    ) -> ConflictableTransactionResult<(), OrderError> {
        for item in items {
            let current = match tree.get(item.sku.as_bytes())? {
                Some(raw) => match decode_quantity(&item.sku, &raw) {
                    Ok(quantity) => quantity,
                    Err(err) => return abort(err),
                },
                None => 0,
            };

            let restored = current.saturating_add(item.quantity);
            tree.insert(item.sku.as_bytes(), restored.to_be_bytes().to_vec())?;
        }

        Ok(())
    }
}

fn decode_quantity(sku: &str, raw: &[u8]) -> Result<u64, OrderError> {
    let bytes: [u8; 8] = raw
        .try_into()
        .map_err(|_| OrderError::Corrupt(format!("stock entry for {sku} is not a u64")))?;

    Ok(u64::from_be_bytes(bytes))
}

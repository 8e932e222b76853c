use super::status::OrderStatus;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Status `{status}` is not part of the order lifecycle")]
    UnknownStatus { status: String },
    #[error(
        "Order cannot move from '{from_label}' to '{to_label}'; allowed next: [{}]",
        join_labels(.allowed)
    )]
    IllegalTransition {
        from: OrderStatus,
        to: OrderStatus,
        from_label: &'static str,
        to_label: &'static str,
        allowed: Vec<OrderStatus>,
    },
}

impl TransitionError {
    pub(crate) fn illegal(from: OrderStatus, to: OrderStatus, allowed: &[OrderStatus]) -> Self {
        Self::IllegalTransition {
            from,
            to,
            from_label: from.label(),
            to_label: to.label(),
            allowed: allowed.to_vec(),
        }
    }

    /// Unknown statuses mean the caller and this build disagree on the
    /// schema. They are faults to alert on, not input to show a user.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::UnknownStatus { .. })
    }

    /// Statuses the operator may pick instead. Empty for unknown statuses.
    pub fn allowed(&self) -> &[OrderStatus] {
        match self {
            Self::UnknownStatus { .. } => &[],
            Self::IllegalTransition { allowed, .. } => allowed,
        }
    }
}

fn join_labels(statuses: &[OrderStatus]) -> String {
    statuses
        .iter()
        .map(|status| status.label())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(thiserror::Error, Debug)]
pub enum OrderError {
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("Order {0} does not exist")]
    NotFound(String),
    #[error("Order has no line items")]
    EmptyOrder,
    #[error("Line item {sku} has a zero quantity")]
    InvalidLineItem { sku: String },
    #[error("Insufficient stock for {sku}: requested {requested}, available {available}")]
    InsufficientStock {
        sku: String,
        requested: u64,
        available: u64,
    },
    #[error("Order {0} was modified outside its lock")]
    Conflict(String),
    #[error("Stored record could not be decoded: {0}")]
    Corrupt(String),
    #[error("Storage failure: {0}")]
    Storage(#[from] sled::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<minicbor::decode::Error> for OrderError {
    fn from(value: minicbor::decode::Error) -> Self {
        OrderError::Corrupt(value.to_string())
    }
}

impl From<minicbor::encode::Error<std::convert::Infallible>> for OrderError {
    fn from(value: minicbor::encode::Error<std::convert::Infallible>) -> Self {
        OrderError::Internal(anyhow::Error::msg(value.to_string()))
    }
}

impl From<sled::transaction::TransactionError<OrderError>> for OrderError {
    fn from(value: sled::transaction::TransactionError<OrderError>) -> Self {
        match value {
            sled::transaction::TransactionError::Abort(err) => err,
            sled::transaction::TransactionError::Storage(err) => OrderError::Storage(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_message_lists_labels() {
        let err = TransitionError::illegal(
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
            &[OrderStatus::PurchaseConfirmed, OrderStatus::ReturnRequested],
        );

        assert_eq!(
            err.to_string(),
            "Order cannot move from 'Delivered' to 'Cancelled'; allowed next: [Purchase confirmed, Return requested]"
        );
        assert!(!err.is_internal());
    }

    #[test]
    fn unknown_status_is_internal() {
        let err = TransitionError::UnknownStatus {
            status: "on_hold".into(),
        };

        assert!(err.is_internal());
        assert!(err.allowed().is_empty());
    }
}

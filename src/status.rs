//! Order statuses, their labels and stable storage codes
use super::error::TransitionError;
use std::fmt;

#[derive(
    minicbor::Encode, minicbor::Decode, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[cbor(index_only)]
pub enum OrderStatus {
    #[n(0)]
    PaymentCompleted,
    #[n(1)]
    Preparing,
    #[n(2)]
    Shipped,
    #[n(3)]
    InTransit,
    #[n(4)]
    Delivered,
    #[n(5)]
    PurchaseConfirmed,
    #[n(6)]
    CancelRequested,
    #[n(7)]
    Cancelled,
    #[n(8)]
    ReturnRequested,
    #[n(9)]
    Returned,
    #[n(10)]
    ExchangeRequested,
    #[n(11)]
    Exchanged,
}

impl OrderStatus {
    /// Every status, ordered by [`OrderStatus::index`]. A new variant must be
    /// added here, to `index` and with the next `#[n]` tag; the tests check
    /// all three agree.
    pub const ALL: [OrderStatus; 12] = [
        Self::PaymentCompleted,
        Self::Preparing,
        Self::Shipped,
        Self::InTransit,
        Self::Delivered,
        Self::PurchaseConfirmed,
        Self::CancelRequested,
        Self::Cancelled,
        Self::ReturnRequested,
        Self::Returned,
        Self::ExchangeRequested,
        Self::Exchanged,
    ];

    /// Position of the status inside [`OrderStatus::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::PaymentCompleted => 0,
            Self::Preparing => 1,
            Self::Shipped => 2,
            Self::InTransit => 3,
            Self::Delivered => 4,
            Self::PurchaseConfirmed => 5,
            Self::CancelRequested => 6,
            Self::Cancelled => 7,
            Self::ReturnRequested => 8,
            Self::Returned => 9,
            Self::ExchangeRequested => 10,
            Self::Exchanged => 11,
        }
    }

    /// Human readable label used in audit lines and rejection messages
    pub const fn label(self) -> &'static str {
        match self {
            Self::PaymentCompleted => "Payment completed",
            Self::Preparing => "Preparing",
            Self::Shipped => "Shipped",
            Self::InTransit => "In transit",
            Self::Delivered => "Delivered",
            Self::PurchaseConfirmed => "Purchase confirmed",
            Self::CancelRequested => "Cancel requested",
            Self::Cancelled => "Cancelled",
            Self::ReturnRequested => "Return requested",
            Self::Returned => "Returned",
            Self::ExchangeRequested => "Exchange requested",
            Self::Exchanged => "Exchanged",
        }
    }

    /// Stable code written wherever a status leaves the process.
    pub const fn code(self) -> &'static str {
        match self {
            Self::PaymentCompleted => "payment_completed",
            Self::Preparing => "preparing",
            Self::Shipped => "shipped",
            Self::InTransit => "in_transit",
            Self::Delivered => "delivered",
            Self::PurchaseConfirmed => "purchase_confirmed",
            Self::CancelRequested => "cancel_requested",
            Self::Cancelled => "cancelled",
            Self::ReturnRequested => "return_requested",
            Self::Returned => "returned",
            Self::ExchangeRequested => "exchange_requested",
            Self::Exchanged => "exchanged",
        }
    }

    /// Exact lookup of a stored code. There is no normalisation: `"Shipped"`
    /// or `" shipped"` are unknown statuses, not typos to be fixed up.
    pub fn from_code(code: &str) -> Result<Self, TransitionError> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.code() == code)
            .ok_or_else(|| TransitionError::UnknownStatus {
                status: code.to_string(),
            })
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = TransitionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

//! The transition graph and the check every status change goes through
use super::error::TransitionError;
use super::status::OrderStatus;

/// Stateless authority over the order status graph.
///
/// Every method is a pure function of its arguments, so it may be called from
/// any thread without coordination. Serialising transitions for one order is
/// the caller's job (see [`crate::locks::OrderLocks`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct TransitionAuthority;

impl TransitionAuthority {
    /// Statuses reachable in one step from `current`.
    ///
    /// This match is the only place the graph is written down. It is
    /// exhaustive, so a new status does not compile until it has an entry,
    /// even if that entry is empty.
    pub const fn allowed_from(current: OrderStatus) -> &'static [OrderStatus] {
        use OrderStatus::*;

        match current {
            PaymentCompleted => &[Preparing, CancelRequested],
            Preparing => &[Shipped, CancelRequested],
            Shipped => &[InTransit],
            InTransit => &[Delivered],
            Delivered => &[PurchaseConfirmed, ReturnRequested, ExchangeRequested],
            PurchaseConfirmed => &[],
            CancelRequested => &[Cancelled],
            Cancelled => &[],
            ReturnRequested => &[Returned],
            Returned => &[],
            ExchangeRequested => &[Exchanged],
            Exchanged => &[],
        }
    }

    pub fn can_transition(current: OrderStatus, requested: OrderStatus) -> bool {
        Self::allowed_from(current).contains(&requested)
    }

    /// Accepts or rejects `current -> requested`.
    pub fn validate(current: OrderStatus, requested: OrderStatus) -> Result<(), TransitionError> {
        let allowed = Self::allowed_from(current);

        if allowed.contains(&requested) {
            Ok(())
        } else {
            Err(TransitionError::illegal(current, requested, allowed))
        }
    }

    /// Same as [`TransitionAuthority::validate`] for statuses that arrive as
    /// stored codes. A code this build does not know is an `UnknownStatus`.
    pub fn validate_codes(current: &str, requested: &str) -> Result<(), TransitionError> {
        let current = OrderStatus::from_code(current)?;
        let requested = OrderStatus::from_code(requested)?;

        Self::validate(current, requested)
    }
}

//! Follow-on actions owed by an accepted transition
use super::authority::TransitionAuthority;
use super::error::TransitionError;
use super::status::OrderStatus;

/// What the caller has to do besides persisting the new status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SideEffects {
    pub restore_inventory: bool,
}

/// A transition the authority accepted, with its classified side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AcceptedTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
    pub effects: SideEffects,
}

/// True when stock taken by the order has to go back on the shelf.
/// Exchanges net to zero and confirmed purchases keep their stock.
/// Legality of reaching `new_status` is not checked here.
pub const fn needs_inventory_restore(new_status: OrderStatus) -> bool {
    matches!(new_status, OrderStatus::Cancelled | OrderStatus::Returned)
}

/// Terminal statuses have no outgoing edges.
pub const fn is_terminal(status: OrderStatus) -> bool {
    TransitionAuthority::allowed_from(status).is_empty()
}

pub const fn classify(new_status: OrderStatus) -> SideEffects {
    SideEffects {
        restore_inventory: needs_inventory_restore(new_status),
    }
}

/// Validate `from -> to` and classify it in one call.
pub fn resolve(from: OrderStatus, to: OrderStatus) -> Result<AcceptedTransition, TransitionError> {
    TransitionAuthority::validate(from, to)?;

    Ok(AcceptedTransition {
        from,
        to,
        effects: classify(to),
    })
}

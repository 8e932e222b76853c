//! Order lifecycle: which status changes are legal, which of them owe stock
//! back to inventory, and a sled-backed service that applies them one order
//! at a time.

pub mod authority;
pub mod config;
pub mod effects;
pub mod error;
pub mod inventory;
pub mod locks;
pub mod logging;
pub mod order;
pub mod record;
pub mod service;
pub mod status;
pub mod utils;

pub use authority::TransitionAuthority;
pub use effects::{AcceptedTransition, SideEffects, is_terminal, needs_inventory_restore};
pub use error::{OrderError, TransitionError};
pub use status::OrderStatus;

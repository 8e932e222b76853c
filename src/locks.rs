//! Per-order mutual exclusion for the read, validate, persist sequence
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

/// Hands out one lock per order id. Slots are created on first use and
/// dropped again once nobody holds or waits on them.
#[derive(Debug, Default)]
pub struct OrderLocks {
    slots: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OrderLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` while holding the lock for `order_id`. Calls for other orders
    /// proceed in parallel.
    pub fn with_order<T>(&self, order_id: &str, f: impl FnOnce() -> T) -> T {
        let slot = {
            let mut slots = self.slots.lock();
            slots.entry(order_id.to_string()).or_default().clone()
        };

        let release = SlotRelease {
            locks: self,
            order_id,
            slot,
        };
        let _held = release.slot.lock();

        f()
    }

    /// Number of orders currently holding or waiting on a slot
    pub fn in_flight(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Drops the map entry for an order once the last user is done with it,
/// including when the locked closure unwinds.
struct SlotRelease<'a> {
    locks: &'a OrderLocks,
    order_id: &'a str,
    slot: Arc<Mutex<()>>,
}

impl Drop for SlotRelease<'_> {
    fn drop(&mut self) {
        // one reference lives in the map, one is ours
        let mut slots = self.locks.slots.lock();
        if Arc::strong_count(&self.slot) == 2 {
            slots.remove(self.order_id);
        }
    }
}

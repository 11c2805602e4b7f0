//! Signal/slot notifications for Horizon Annotate.
//!
//! Tags expose signals for their observable state (a label's selection, its
//! resolved value). Annotation events are processed one at a time on the
//! thread that owns the document, so every slot is invoked directly and
//! synchronously, before `emit` returns.
//!
//! # Example
//!
//! ```
//! use horizon_annotate_core::Signal;
//!
//! let selected_changed = Signal::<bool>::new();
//! let id = selected_changed.connect(|selected| {
//!     println!("selected = {selected}");
//! });
//!
//! selected_changed.emit(true);
//! selected_changed.disconnect(id);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// A connected slot and its position in connection order.
struct Connection<Args> {
    seq: u64,
    slot: Slot<Args>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// Slots are invoked in connection order. The connection list is snapshotted
/// before invocation, so a slot may connect or disconnect other slots on the
/// same signal without deadlocking.
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
    next_seq: AtomicU64,
    blocked: AtomicBool,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
            next_seq: AtomicU64::new(0),
            blocked: AtomicBool::new(false),
        }
    }

    /// Connect a slot (closure) to this signal.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.connections.lock().insert(Connection {
            seq,
            slot: Arc::new(slot),
        })
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect all slots from this signal.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Block signal emission temporarily.
    ///
    /// While blocked, calls to `emit()` do nothing.
    pub fn set_blocked(&self, blocked: bool) {
        self.blocked.store(blocked, Ordering::SeqCst);
    }

    /// Check if signal emission is currently blocked.
    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    /// Emit the signal, invoking all connected slots.
    #[tracing::instrument(skip_all, target = "horizon_annotate_core::signal", level = "trace")]
    pub fn emit(&self, args: Args) {
        if self.is_blocked() {
            tracing::trace!(target: "horizon_annotate_core::signal", "signal blocked, skipping emit");
            return;
        }

        let mut ordered: Vec<(u64, Slot<Args>)> = self
            .connections
            .lock()
            .values()
            .map(|c| (c.seq, c.slot.clone()))
            .collect();
        ordered.sort_unstable_by_key(|&(seq, _)| seq);
        let slots: Vec<Slot<Args>> = ordered.into_iter().map(|(_, slot)| slot).collect();
        tracing::trace!(target: "horizon_annotate_core::signal", connection_count = slots.len(), "emitting signal");

        for slot in slots {
            slot(&args);
        }
    }

    /// Connect a slot that is disconnected when the returned guard is dropped.
    pub fn connect_scoped<F>(self: &Arc<Self>, slot: F) -> ConnectionGuard<Args>
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let id = self.connect(slot);
        ConnectionGuard {
            signal: Arc::downgrade(self),
            id,
        }
    }
}

impl<Args> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .field("blocked", &self.is_blocked())
            .finish()
    }
}

/// RAII guard that disconnects its slot when dropped.
///
/// Holds a weak reference, so dropping the guard after the signal is gone
/// is a no-op.
pub struct ConnectionGuard<Args> {
    signal: std::sync::Weak<Signal<Args>>,
    id: ConnectionId,
}

impl<Args> ConnectionGuard<Args> {
    /// The underlying connection ID.
    pub fn id(&self) -> ConnectionId {
        self.id
    }
}

impl<Args> Drop for ConnectionGuard<Args> {
    fn drop(&mut self) {
        if let Some(signal) = self.signal.upgrade() {
            signal.disconnect(self.id);
        }
    }
}

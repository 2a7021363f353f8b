//! Synchronous signal/slot primitive.
//!
//! A [`Signal<Args>`] is a multi-subscriber notification list: slots
//! (closures) are connected, and every emit invokes each connected slot
//! synchronously on the emitting thread, in no guaranteed order. This is
//! the only delivery model in the hotkey system — there is no queued or
//! deferred variant, and slot panics are the slot's problem.
//!
//! # Example
//!
//! ```
//! use horizon_hotkey::Signal;
//!
//! let signal = Signal::<i32>::new();
//! let id = signal.connect(|&value| println!("got {value}"));
//! signal.emit(&42);
//! signal.disconnect(id);
//! ```

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

new_key_type! {
    /// Identifier for a signal-slot connection, used to disconnect it.
    pub struct ConnectionId;
}

struct Connection<Args> {
    slot: Box<dyn Fn(&Args) + Send + Sync>,
}

/// A synchronous, multi-subscriber signal.
///
/// `Signal<Args>` is `Send + Sync`; slots may be connected and the signal
/// emitted from any thread. Slots run on whichever thread calls
/// [`emit`](Self::emit).
pub struct Signal<Args> {
    connections: Mutex<SlotMap<ConnectionId, Connection<Args>>>,
}

impl<Args> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args> Signal<Args> {
    /// Create a signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(SlotMap::with_key()),
        }
    }

    /// Connect a slot. Returns an id for later disconnection.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        self.connections.lock().insert(Connection {
            slot: Box::new(slot),
        })
    }

    /// Disconnect a slot by id.
    ///
    /// Returns `true` if the connection existed and was removed.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        self.connections.lock().remove(id).is_some()
    }

    /// Disconnect every slot.
    pub fn disconnect_all(&self) {
        self.connections.lock().clear();
    }

    /// The number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().len()
    }

    /// Invoke every connected slot with `args`, synchronously, on the
    /// current thread.
    pub fn emit(&self, args: &Args) {
        let connections = self.connections.lock();
        for (_, connection) in connections.iter() {
            (connection.slot)(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn connect_and_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(&42);
        signal.emit(&100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn disconnect_stops_delivery() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let id = signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(&1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));
        signal.emit(&2);

        assert_eq!(*received.lock(), vec![1]);
    }

    #[test]
    fn multiple_connections_all_fire() {
        let signal = Signal::<()>::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let count_clone = count.clone();
            signal.connect(move |_| {
                count_clone.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(signal.connection_count(), 3);
        signal.emit(&());
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn disconnect_all() {
        let signal = Signal::<()>::new();
        for _ in 0..5 {
            signal.connect(|_| {});
        }

        assert_eq!(signal.connection_count(), 5);
        signal.disconnect_all();
        assert_eq!(signal.connection_count(), 0);
    }

    #[test]
    fn emit_with_no_connections_is_a_noop() {
        let signal = Signal::<String>::new();
        signal.emit(&"nobody listening".to_string());
    }

    #[test]
    fn slots_run_on_the_emitting_thread() {
        let signal = Arc::new(Signal::<i32>::new());
        let slot_thread = Arc::new(Mutex::new(None));

        let slot_thread_clone = slot_thread.clone();
        signal.connect(move |_| {
            *slot_thread_clone.lock() = Some(std::thread::current().id());
        });

        let signal_clone = signal.clone();
        let emitting_thread = std::thread::spawn(move || {
            signal_clone.emit(&7);
            std::thread::current().id()
        })
        .join()
        .unwrap();

        assert_eq!(*slot_thread.lock(), Some(emitting_thread));
    }

    #[test]
    fn emit_from_multiple_threads() {
        let signal = Arc::new(Signal::<usize>::new());
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        signal.connect(move |&n| {
            count_clone.fetch_add(n, Ordering::SeqCst);
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let signal_clone = signal.clone();
                std::thread::spawn(move || signal_clone.emit(&1))
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(count.load(Ordering::SeqCst), 8);
    }
}

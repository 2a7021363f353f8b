//! The hotkey registry: id allocation, OS call marshaling, notification
//! decoding, and deterministic teardown.
//!
//! [`HotkeyRegistry`] owns the mapping from [`Hotkey`] value to the small
//! integer id the OS knows the registration by. Registration and release
//! calls are marshaled onto the sink's owning thread through
//! [`MessageSink::invoke`]; raw notifications coming back from the sink
//! are decoded and republished on a typed capture signal.
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn demo() -> horizon_hotkey::Result<()> {
//! use std::sync::Arc;
//! use horizon_hotkey::{Hotkey, HotkeyRegistry, Key, MessageWindow, Modifiers};
//!
//! let sink = Arc::new(MessageWindow::new()?);
//! let mut registry = HotkeyRegistry::with_native_binding(sink);
//!
//! registry.on_captured().connect(|capture| {
//!     println!("hotkey {:?} pressed", capture.hotkey);
//! });
//! registry.add(Hotkey::new(Modifiers::CONTROL | Modifiers::ALT, Key::K))?;
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! The registry performs no concurrent execution of its own. `add`,
//! `remove`, and `dispose` run on the calling thread and block while the
//! marshaled OS call completes; callers serialize their own access
//! (`&mut self`). Captures are emitted synchronously on whichever thread
//! the sink delivers raw messages from.

use std::collections::HashMap;
use std::sync::Arc;

use crate::binding::HotkeyBinding;
use crate::error::{HotkeyError, Result};
use crate::event::{HotkeyCapture, RawMessage, SystemHotkey, WM_HOTKEY};
use crate::hotkey::{Hotkey, Key, Modifiers};
use crate::signal::{ConnectionId, Signal};
use crate::sink::MessageSink;

/// Registry of global hotkeys bound through a [`MessageSink`].
///
/// Entries live until [`remove`](Self::remove) or [`dispose`](Self::dispose);
/// dropping the registry disposes it, so every OS-held registration is
/// released no later than the registry's own destruction.
pub struct HotkeyRegistry {
    sink: Arc<dyn MessageSink>,
    binding: Arc<dyn HotkeyBinding>,
    hotkeys: HashMap<Hotkey, i32>,
    captured: Arc<Signal<HotkeyCapture>>,
    subscription: Option<ConnectionId>,
    disposed: bool,
}

impl HotkeyRegistry {
    /// Create a registry over `sink`, issuing OS calls through `binding`.
    ///
    /// Subscribes to the sink's raw-message signal immediately; captures
    /// can fire for OS-reserved hotkeys even before the first `add`.
    pub fn new(sink: Arc<dyn MessageSink>, binding: Arc<dyn HotkeyBinding>) -> Self {
        let captured = Arc::new(Signal::new());

        let capture_signal = Arc::clone(&captured);
        let subscription = sink.raw_messages().connect(move |message| {
            if let Some(capture) = decode(message) {
                tracing::trace!(target: "horizon_hotkey::registry", id = capture.id, "hotkey notification");
                capture_signal.emit(&capture);
            }
        });

        Self {
            sink,
            binding,
            hotkeys: HashMap::new(),
            captured,
            subscription: Some(subscription),
            disposed: false,
        }
    }

    /// Create a registry issuing OS calls through the native Win32 binding.
    #[cfg(target_os = "windows")]
    pub fn with_native_binding(sink: Arc<dyn MessageSink>) -> Self {
        Self::new(sink, Arc::new(crate::binding::Win32Binding))
    }

    /// Register a global hotkey.
    ///
    /// Allocates the lowest free non-negative id, then binds the
    /// combination on the sink's owning thread. Adding an already
    /// registered hotkey is a no-op. On failure the tentative entry is
    /// rolled back so the id is free again, and the error (carrying the
    /// OS error code, where there is one) is returned.
    pub fn add(&mut self, hotkey: Hotkey) -> Result<()> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }
        if self.hotkeys.contains_key(&hotkey) {
            return Ok(());
        }

        let id = self.free_id();
        self.hotkeys.insert(hotkey, id);

        let binding = Arc::clone(&self.binding);
        let outcome = self.sink.invoke(Box::new(move |handle| {
            let handle = handle.ok_or(HotkeyError::HandleUnavailable)?;
            binding.bind(handle, id, hotkey)
        }));

        if let Err(error) = outcome {
            self.hotkeys.remove(&hotkey);
            return Err(error);
        }

        tracing::debug!(target: "horizon_hotkey::registry", %hotkey, id, "hotkey bound");
        Ok(())
    }

    /// Release a registered hotkey.
    ///
    /// Removing a hotkey that is not registered is a no-op. The OS unbind
    /// runs on the sink's owning thread; it is skipped (not an error) when
    /// the sink has no native handle, since there is nothing left to
    /// release. If the OS refuses the unbind the entry is restored — the
    /// binding is still live, so its id must not be reused — and the
    /// error is returned.
    pub fn remove(&mut self, hotkey: Hotkey) -> Result<()> {
        if self.disposed {
            return Err(HotkeyError::Disposed);
        }
        let Some(id) = self.hotkeys.remove(&hotkey) else {
            return Ok(());
        };

        let binding = Arc::clone(&self.binding);
        let outcome = self.sink.invoke(Box::new(move |handle| match handle {
            Some(handle) => binding.unbind(handle, id),
            None => Ok(()),
        }));

        if let Err(error) = outcome {
            self.hotkeys.insert(hotkey, id);
            return Err(error);
        }

        tracing::debug!(target: "horizon_hotkey::registry", %hotkey, id, "hotkey released");
        Ok(())
    }

    /// Snapshot of the current hotkey → id mapping.
    ///
    /// The returned map is the caller's copy and is unaffected by
    /// subsequent registry mutation.
    pub fn registered(&self) -> HashMap<Hotkey, i32> {
        self.hotkeys.clone()
    }

    /// The capture signal, fired once per decoded hotkey notification.
    pub fn on_captured(&self) -> &Signal<HotkeyCapture> {
        &self.captured
    }

    /// Tear down the registry: stop listening to the sink and release
    /// every remaining OS registration.
    ///
    /// Idempotent; a second call is a no-op. Each unbind is best-effort —
    /// a failure on one entry never prevents attempts on the rest, and is
    /// reported through `tracing::warn!` rather than returned. `Drop`
    /// calls this, so explicit disposal is only needed to control timing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;

        if let Some(id) = self.subscription.take() {
            self.sink.raw_messages().disconnect(id);
        }

        for (hotkey, id) in self.hotkeys.drain() {
            let binding = Arc::clone(&self.binding);
            let outcome = self.sink.invoke(Box::new(move |handle| match handle {
                Some(handle) => binding.unbind(handle, id),
                None => Ok(()),
            }));
            if let Err(error) = outcome {
                tracing::warn!(target: "horizon_hotkey::registry", %hotkey, id, %error, "failed to release hotkey during teardown");
            }
        }
    }

    /// The lowest non-negative id not currently assigned.
    ///
    /// Sort the assigned ids; the first index whose id differs from it is
    /// free. If ids are exactly `0..N`, the next id is `N`. Freed ids are
    /// therefore reused before new ones are minted, bounding id growth to
    /// the high-water mark of concurrent registrations.
    fn free_id(&self) -> i32 {
        if self.hotkeys.is_empty() {
            return 0;
        }

        let mut ids: Vec<i32> = self.hotkeys.values().copied().collect();
        ids.sort_unstable();

        for (index, &id) in ids.iter().enumerate() {
            if id != index as i32 {
                return index as i32;
            }
        }
        ids.len() as i32
    }
}

impl Drop for HotkeyRegistry {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Decode a raw message into a capture, or `None` for non-hotkey messages.
///
/// `wparam` carries the id. `lparam`'s low 32 bits pack the modifier bits
/// (low 16) and the key code (high 16). Negative ids are OS-reserved
/// hotkeys: the capture carries the reserved marker and no payload
/// decoding is attempted.
fn decode(message: &RawMessage) -> Option<HotkeyCapture> {
    if message.message != WM_HOTKEY {
        return None;
    }

    let id = message.wparam as i32;
    if id < 0 {
        return Some(HotkeyCapture {
            id,
            hotkey: None,
            system: SystemHotkey::from_id(id),
        });
    }

    let data = message.lparam as u32;
    let modifiers =
        Modifiers::from_bits_truncate((data & 0xFFFF) as u16).without(Modifiers::NOREPEAT);
    let key = Key::from_raw((data >> 16) as u16);

    Some(HotkeyCapture {
        id,
        hotkey: Some(Hotkey::new(modifiers, key)),
        system: SystemHotkey::None,
    })
}

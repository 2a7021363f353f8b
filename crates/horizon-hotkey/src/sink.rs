//! The message sink contract.
//!
//! A message sink owns a native message-receiving handle and the thread
//! that handle is affined to. The registry consumes sinks through the
//! [`MessageSink`] trait: raw notifications arrive on the sink's signal,
//! and OS bind/unbind calls are marshaled onto the sink's owning thread
//! through [`invoke`](MessageSink::invoke) — an OS affinity rule, not a
//! design choice.
//!
//! On Windows the crate ships [`MessageWindow`](crate::MessageWindow) as
//! a headless implementation; UI frameworks that already own a message
//! loop can implement the trait over their own window instead.

use std::num::NonZeroIsize;

use crate::error::Result;
use crate::event::RawMessage;
use crate::signal::Signal;

/// A native window handle, platform-opaque and never null.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowHandle(NonZeroIsize);

impl WindowHandle {
    /// Wrap a raw handle value. Returns `None` for the null sentinel.
    pub fn from_raw(raw: isize) -> Option<Self> {
        NonZeroIsize::new(raw).map(Self)
    }

    /// The raw handle value.
    pub fn raw(self) -> isize {
        self.0.get()
    }
}

/// A unit of work marshaled onto the sink's owning thread.
///
/// The sink reads its current native handle on the owning thread and
/// passes it to the work, so the handle check and the OS call happen on
/// the thread the handle is affined to.
pub type InvokeWork = Box<dyn FnOnce(Option<WindowHandle>) -> Result<()> + Send>;

/// A native message sink: the collaborator that owns the message-receiving
/// handle and its thread.
pub trait MessageSink: Send + Sync {
    /// The signal fired once per received native message.
    fn raw_messages(&self) -> &Signal<RawMessage>;

    /// The current native handle, or `None` if the window does not exist
    /// (not yet created, or already destroyed).
    fn window_handle(&self) -> Option<WindowHandle>;

    /// Execute `work` synchronously on the sink's owning thread,
    /// propagating its outcome to the caller.
    ///
    /// Blocks the calling thread until the work completes.
    fn invoke(&self, work: InvokeWork) -> Result<()>;
}

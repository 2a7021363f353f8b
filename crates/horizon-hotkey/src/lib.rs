//! Global hotkey registration and dispatch for Horizon applications.
//!
//! This crate registers key + modifier combinations with the operating
//! system as global shortcuts and delivers typed notifications when they
//! are pressed, even while the application is not focused:
//!
//! - **Hotkey values**: [`Hotkey`], [`Modifiers`], [`Key`] — immutable,
//!   hashable shortcut descriptions
//! - **Registry**: [`HotkeyRegistry`] — id allocation, OS call
//!   marshaling, notification decoding, deterministic teardown
//! - **Message sink**: the [`MessageSink`] trait, plus the headless
//!   [`MessageWindow`] implementation on Windows
//! - **Signals**: [`Signal`] — the synchronous multi-subscriber
//!   notification primitive used throughout
//!
//! # Example
//!
//! ```no_run
//! # #[cfg(target_os = "windows")]
//! # fn main() -> horizon_hotkey::Result<()> {
//! use std::sync::Arc;
//! use horizon_hotkey::{Hotkey, HotkeyRegistry, MessageWindow};
//!
//! let sink = Arc::new(MessageWindow::new()?);
//! let mut registry = HotkeyRegistry::with_native_binding(sink);
//!
//! registry.on_captured().connect(|capture| {
//!     if let Some(hotkey) = capture.hotkey {
//!         println!("{hotkey} pressed (id {})", capture.id);
//!     }
//! });
//!
//! registry.add("Ctrl+Alt+K".parse::<Hotkey>().unwrap())?;
//! # Ok(())
//! # }
//! # #[cfg(not(target_os = "windows"))]
//! # fn main() {}
//! ```
//!
//! # Thread affinity
//!
//! The OS requires bind and unbind calls to execute on the thread owning
//! the sink's native handle. The registry never assumes a concurrency
//! primitive for this: it hands closures to
//! [`MessageSink::invoke`], and the sink marshals them onto its owning
//! thread. [`MessageWindow`] provides that marshaling for headless use;
//! a UI framework that owns its own message window can implement
//! [`MessageSink`] instead and host the registry directly.
//!
//! # Logging
//!
//! Structured events are emitted through [`tracing`] under the
//! `horizon_hotkey::registry` and `horizon_hotkey::message_window`
//! targets. The crate installs no subscriber.

mod binding;
mod error;
mod event;
mod hotkey;
#[cfg(target_os = "windows")]
mod message_window;
mod registry;
pub mod signal;
mod sink;

pub use binding::HotkeyBinding;
#[cfg(target_os = "windows")]
pub use binding::Win32Binding;
pub use error::{HotkeyError, Result};
pub use event::{HotkeyCapture, RawMessage, SystemHotkey, WM_HOTKEY};
pub use hotkey::{Hotkey, Key, Modifiers, ParseHotkeyError};
#[cfg(target_os = "windows")]
pub use message_window::MessageWindow;
pub use registry::HotkeyRegistry;
pub use signal::{ConnectionId, Signal};
pub use sink::{InvokeWork, MessageSink, WindowHandle};

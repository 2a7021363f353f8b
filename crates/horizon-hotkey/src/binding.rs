//! The OS hotkey binding call pair.
//!
//! [`HotkeyBinding`] abstracts the two native operations the registry
//! needs — activate and deactivate a global hotkey for a handle/id pair.
//! The registry receives a binding by injection, so tests substitute a
//! recording double and the core never links the OS API directly.

use crate::error::Result;
use crate::hotkey::Hotkey;
use crate::sink::WindowHandle;

/// The native bind/unbind operation pair.
///
/// Both calls MUST be issued on the thread owning `handle`; the registry
/// guarantees this by routing them through
/// [`MessageSink::invoke`](crate::MessageSink::invoke).
pub trait HotkeyBinding: Send + Sync {
    /// Activate a global hotkey for `handle` under `id`.
    ///
    /// Fails with [`Registration`](crate::HotkeyError::Registration) if the
    /// OS declines, e.g. because another process holds the combination.
    fn bind(&self, handle: WindowHandle, id: i32, hotkey: Hotkey) -> Result<()>;

    /// Deactivate the global hotkey registered under `id` for `handle`.
    fn unbind(&self, handle: WindowHandle, id: i32) -> Result<()>;
}

#[cfg(target_os = "windows")]
pub use self::windows_impl::Win32Binding;

// ============================================================================
// Windows Implementation
// ============================================================================

#[cfg(target_os = "windows")]
mod windows_impl {
    use windows::Win32::Foundation::HWND;
    use windows::Win32::UI::Input::KeyboardAndMouse::{
        HOT_KEY_MODIFIERS, RegisterHotKey, UnregisterHotKey,
    };

    use super::HotkeyBinding;
    use crate::error::{HotkeyError, Result};
    use crate::hotkey::Hotkey;
    use crate::sink::WindowHandle;

    /// [`HotkeyBinding`] over `RegisterHotKey`/`UnregisterHotKey`.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Win32Binding;

    fn hwnd(handle: WindowHandle) -> HWND {
        HWND(handle.raw() as *mut core::ffi::c_void)
    }

    impl HotkeyBinding for Win32Binding {
        fn bind(&self, handle: WindowHandle, id: i32, hotkey: Hotkey) -> Result<()> {
            unsafe {
                RegisterHotKey(
                    hwnd(handle),
                    id,
                    HOT_KEY_MODIFIERS(hotkey.modifiers.bits() as u32),
                    hotkey.key.raw() as u32,
                )
            }
            .map_err(|e| HotkeyError::Registration { code: e.code().0 })
        }

        fn unbind(&self, handle: WindowHandle, id: i32) -> Result<()> {
            unsafe { UnregisterHotKey(hwnd(handle), id) }
                .map_err(|e| HotkeyError::Unregistration { code: e.code().0 })
        }
    }
}

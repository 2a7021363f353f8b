//! Error types for the hotkey system.

/// Result type alias for hotkey operations.
pub type Result<T> = std::result::Result<T, HotkeyError>;

/// Errors that can occur while registering, releasing, or dispatching
/// global hotkeys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HotkeyError {
    /// The OS declined to bind the hotkey (typically because another
    /// process already claimed the combination). Carries the OS error code.
    #[error("failed to register hotkey (OS error {code})")]
    Registration { code: i32 },

    /// The OS declined to release a previously bound hotkey.
    #[error("failed to unregister hotkey (OS error {code})")]
    Unregistration { code: i32 },

    /// The message sink has no valid native window handle, so the OS call
    /// cannot be issued.
    #[error("message sink has no native window handle")]
    HandleUnavailable,

    /// The registry has already been disposed.
    #[error("hotkey registry has been disposed")]
    Disposed,

    /// The sink's message pump has exited and can no longer run work.
    #[error("message sink thread is no longer running")]
    SinkStopped,

    /// Failed to create the native message window.
    #[error("failed to create message window: {0}")]
    WindowCreation(String),
}

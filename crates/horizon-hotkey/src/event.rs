//! Event payload types carried between the message sink and subscribers.

use crate::hotkey::Hotkey;

/// The OS message code for a global hotkey notification (`WM_HOTKEY`).
pub const WM_HOTKEY: u32 = 0x0312;

/// A raw native message as delivered by a [`MessageSink`](crate::MessageSink).
///
/// `wparam` and `lparam` are the two machine-word parameters of the native
/// message; their meaning depends on `message`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawMessage {
    /// The native message code.
    pub message: u32,
    /// First message parameter.
    pub wparam: usize,
    /// Second message parameter.
    pub lparam: isize,
}

/// Marker distinguishing OS-reserved hotkey notifications from ones the
/// registry assigned.
///
/// The OS reports reserved hotkeys with negative ids; ids the registry
/// assigned are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemHotkey {
    /// Not a reserved hotkey.
    None,
    /// The window-snapping hotkey (id -1).
    SnapWindow,
    /// The desktop-snapping hotkey (id -2).
    SnapDesktop,
    /// A reserved hotkey this crate has no name for.
    Other(i32),
}

impl SystemHotkey {
    /// Derive the marker from a notification id.
    pub const fn from_id(id: i32) -> Self {
        match id {
            -1 => Self::SnapWindow,
            -2 => Self::SnapDesktop,
            id if id < 0 => Self::Other(id),
            _ => Self::None,
        }
    }
}

/// A decoded hotkey notification, published by the registry's capture
/// signal once per OS notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyCapture {
    /// The id the notification was delivered under. Negative for
    /// OS-reserved hotkeys.
    pub id: i32,
    /// The decoded combination, or `None` for OS-reserved notifications.
    pub hotkey: Option<Hotkey>,
    /// Reserved-hotkey marker; [`SystemHotkey::None`] for registry-assigned
    /// ids.
    pub system: SystemHotkey,
}

//! Hotkey value types: modifier set, virtual-key code, and the pair.
//!
//! A [`Hotkey`] is an immutable (modifier set, key code) pair with value
//! equality, suitable for use as a map key. The numeric representations
//! match what the OS hotkey API consumes directly: [`Modifiers`] bits are
//! the Win32 `MOD_*` flags and [`Key`] wraps a virtual-key code, so no
//! translation layer sits between these types and the bind call.
//!
//! # Example
//!
//! ```
//! use horizon_hotkey::{Hotkey, Key, Modifiers};
//!
//! let hotkey = Hotkey::new(Modifiers::CONTROL | Modifiers::ALT, Key::F1);
//! assert_eq!(hotkey.to_string(), "Ctrl+Alt+F1");
//! assert_eq!("ctrl+alt+f1".parse::<Hotkey>().unwrap(), hotkey);
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

/// A set of keyboard modifiers.
///
/// Bit values equal the Win32 `MOD_ALT`/`MOD_CONTROL`/`MOD_SHIFT`/`MOD_WIN`
/// constants, so the set can be handed to the OS bind call unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u16);

impl Modifiers {
    /// The empty set.
    pub const NONE: Self = Self(0);
    /// Either Alt key.
    pub const ALT: Self = Self(0x0001);
    /// Either Control key.
    pub const CONTROL: Self = Self(0x0002);
    /// Either Shift key.
    pub const SHIFT: Self = Self(0x0004);
    /// Either Windows/Super key.
    pub const META: Self = Self(0x0008);
    /// Suppress auto-repeat notifications for the registration.
    ///
    /// This flag participates in the bind call but is never part of a
    /// decoded notification payload.
    pub const NOREPEAT: Self = Self(0x4000);

    const ALL: u16 = 0x000F | 0x4000;

    /// The raw modifier bits.
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Build a set from raw bits, dropping any bit that is not a known flag.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL)
    }

    /// `true` if every flag in `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// `true` if no flag is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// The set with every flag of `other` cleared.
    pub const fn without(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }
}

impl BitOr for Modifiers {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Modifiers {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (flag, name) in [
            (Self::CONTROL, "Ctrl"),
            (Self::ALT, "Alt"),
            (Self::SHIFT, "Shift"),
            (Self::META, "Win"),
        ] {
            if self.contains(flag) {
                if !first {
                    f.write_str("+")?;
                }
                f.write_str(name)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("Modifiers(NONE)");
        }
        write!(f, "Modifiers({self})")?;
        if self.contains(Self::NOREPEAT) {
            f.write_str("+NOREPEAT")?;
        }
        Ok(())
    }
}

/// A virtual-key code.
///
/// Wraps the OS numeric code so any value the OS reports round-trips
/// exactly; named constants cover the keys commonly used in shortcuts.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key(u16);

macro_rules! keys {
    ($(($const:ident, $code:literal, $name:literal),)+) => {
        impl Key {
            $(pub const $const: Self = Self($code);)+

            /// The canonical name of the key, if it has one.
            pub const fn name(self) -> Option<&'static str> {
                match self.0 {
                    $($code => Some($name),)+
                    _ => None,
                }
            }

            fn from_name(name: &str) -> Option<Self> {
                $(if name.eq_ignore_ascii_case($name) {
                    return Some(Self($code));
                })+
                None
            }
        }
    };
}

keys! {
    (BACKSPACE, 0x08, "Backspace"),
    (TAB, 0x09, "Tab"),
    (ENTER, 0x0D, "Enter"),
    (PAUSE, 0x13, "Pause"),
    (CAPS_LOCK, 0x14, "CapsLock"),
    (ESCAPE, 0x1B, "Escape"),
    (SPACE, 0x20, "Space"),
    (PAGE_UP, 0x21, "PageUp"),
    (PAGE_DOWN, 0x22, "PageDown"),
    (END, 0x23, "End"),
    (HOME, 0x24, "Home"),
    (LEFT, 0x25, "Left"),
    (UP, 0x26, "Up"),
    (RIGHT, 0x27, "Right"),
    (DOWN, 0x28, "Down"),
    (PRINT_SCREEN, 0x2C, "PrintScreen"),
    (INSERT, 0x2D, "Insert"),
    (DELETE, 0x2E, "Delete"),
    (D0, 0x30, "0"),
    (D1, 0x31, "1"),
    (D2, 0x32, "2"),
    (D3, 0x33, "3"),
    (D4, 0x34, "4"),
    (D5, 0x35, "5"),
    (D6, 0x36, "6"),
    (D7, 0x37, "7"),
    (D8, 0x38, "8"),
    (D9, 0x39, "9"),
    (A, 0x41, "A"),
    (B, 0x42, "B"),
    (C, 0x43, "C"),
    (D, 0x44, "D"),
    (E, 0x45, "E"),
    (F, 0x46, "F"),
    (G, 0x47, "G"),
    (H, 0x48, "H"),
    (I, 0x49, "I"),
    (J, 0x4A, "J"),
    (K, 0x4B, "K"),
    (L, 0x4C, "L"),
    (M, 0x4D, "M"),
    (N, 0x4E, "N"),
    (O, 0x4F, "O"),
    (P, 0x50, "P"),
    (Q, 0x51, "Q"),
    (R, 0x52, "R"),
    (S, 0x53, "S"),
    (T, 0x54, "T"),
    (U, 0x55, "U"),
    (V, 0x56, "V"),
    (W, 0x57, "W"),
    (X, 0x58, "X"),
    (Y, 0x59, "Y"),
    (Z, 0x5A, "Z"),
    (F1, 0x70, "F1"),
    (F2, 0x71, "F2"),
    (F3, 0x72, "F3"),
    (F4, 0x73, "F4"),
    (F5, 0x74, "F5"),
    (F6, 0x75, "F6"),
    (F7, 0x76, "F7"),
    (F8, 0x77, "F8"),
    (F9, 0x78, "F9"),
    (F10, 0x79, "F10"),
    (F11, 0x7A, "F11"),
    (F12, 0x7B, "F12"),
    (F13, 0x7C, "F13"),
    (F14, 0x7D, "F14"),
    (F15, 0x7E, "F15"),
    (F16, 0x7F, "F16"),
    (F17, 0x80, "F17"),
    (F18, 0x81, "F18"),
    (F19, 0x82, "F19"),
    (F20, 0x83, "F20"),
    (F21, 0x84, "F21"),
    (F22, 0x85, "F22"),
    (F23, 0x86, "F23"),
    (F24, 0x87, "F24"),
    (NUM_LOCK, 0x90, "NumLock"),
    (SCROLL_LOCK, 0x91, "ScrollLock"),
}

impl Key {
    /// Wrap a raw virtual-key code.
    pub const fn from_raw(code: u16) -> Self {
        Self(code)
    }

    /// The raw virtual-key code.
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Keys without a canonical name print as their hex code.
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "0x{:02X}", self.0),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({self})")
    }
}

/// A global keyboard shortcut: a modifier set plus a key code.
///
/// Two hotkeys with equal modifiers and key are interchangeable; the
/// registry never holds two entries for equal values.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Hotkey {
    /// The modifier keys that must be held.
    pub modifiers: Modifiers,
    /// The main key.
    pub key: Key,
}

impl Hotkey {
    /// Create a hotkey from a modifier set and a key.
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.modifiers.without(Modifiers::NOREPEAT).is_empty() {
            write!(f, "{}+", self.modifiers)?;
        }
        write!(f, "{}", self.key)
    }
}

/// Error parsing a hotkey specification string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized token `{token}` in hotkey `{spec}`")]
pub struct ParseHotkeyError {
    spec: String,
    token: String,
}

impl FromStr for Hotkey {
    type Err = ParseHotkeyError;

    /// Parse a `"Ctrl+Alt+F1"`-style specification.
    ///
    /// Tokens are separated by `+`, matched case-insensitively. Every
    /// token but the last must be a modifier name; the last must be a
    /// key name.
    fn from_str(spec: &str) -> std::result::Result<Self, Self::Err> {
        let err = |token: &str| ParseHotkeyError {
            spec: spec.to_string(),
            token: token.to_string(),
        };

        let tokens: Vec<&str> = spec.split('+').map(str::trim).collect();
        let (key_token, modifier_tokens) = tokens.split_last().ok_or_else(|| err(spec))?;

        let mut modifiers = Modifiers::NONE;
        for token in modifier_tokens {
            modifiers |= match token.to_ascii_lowercase().as_str() {
                "alt" => Modifiers::ALT,
                "ctrl" | "control" => Modifiers::CONTROL,
                "shift" => Modifiers::SHIFT,
                "win" | "super" | "meta" => Modifiers::META,
                _ => return Err(err(token)),
            };
        }

        let key = Key::from_name(key_token).ok_or_else(|| err(key_token))?;
        Ok(Self { modifiers, key })
    }
}

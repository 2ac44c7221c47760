//! System-wide hotkey chords.

#[cfg(test)]
pub(crate) mod mock;
mod registrar;
#[cfg(target_os = "windows")]
mod win32;

pub use registrar::{HotKeyHost, HotKeyRegistrar, WM_HOTKEY};
#[cfg(target_os = "windows")]
pub use win32::{Win32HotKeyHost, current_thread_id, post_quit, run_message_loop};

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use crate::error::Error;
use crate::input::keys;

/// Modifier mask, bit-compatible with `RegisterHotKey`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers(u32);

impl Modifiers {
    pub const NONE: Self = Self(0);
    pub const ALT: Self = Self(0x0001);
    pub const CONTROL: Self = Self(0x0002);
    pub const SHIFT: Self = Self(0x0004);
    pub const WIN: Self = Self(0x0008);

    const ALL: u32 = 0x000F;

    /// Keep only the four modifier bits
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
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

/// Display order of modifiers
const MODIFIER_NAMES: [(Modifiers, &str); 4] = [
    (Modifiers::CONTROL, "Ctrl"),
    (Modifiers::ALT, "Alt"),
    (Modifiers::SHIFT, "Shift"),
    (Modifiers::WIN, "Win"),
];

fn parse_modifier(name: &str) -> Option<Modifiers> {
    match name.to_ascii_lowercase().as_str() {
        "ctrl" | "control" => Some(Modifiers::CONTROL),
        "alt" | "menu" => Some(Modifiers::ALT),
        "shift" => Some(Modifiers::SHIFT),
        "win" | "windows" | "super" => Some(Modifiers::WIN),
        _ => None,
    }
}

/// A key plus modifiers, optionally tied to a caller's binding.
///
/// Equality and hashing look at the chord only; the registration id and the
/// binding are bookkeeping.
#[derive(Debug, Clone)]
pub struct HotKey {
    pub key: u16,
    pub modifiers: Modifiers,
    /// Caller's correlation id, opaque to the registrar
    pub binding: Option<String>,
    pub(crate) id: Option<i32>,
}

impl HotKey {
    pub fn new(key: u16, modifiers: Modifiers) -> Self {
        Self {
            key,
            modifiers,
            binding: None,
            id: None,
        }
    }

    pub fn with_binding(mut self, binding: impl Into<String>) -> Self {
        self.binding = Some(binding.into());
        self
    }

    /// Registration id while registered
    pub fn id(&self) -> Option<i32> {
        self.id
    }

    /// Whether both hotkeys name the same chord
    pub fn is_same_chord(&self, other: &HotKey) -> bool {
        self.key == other.key && self.modifiers == other.modifiers
    }
}

impl PartialEq for HotKey {
    fn eq(&self, other: &Self) -> bool {
        self.is_same_chord(other)
    }
}

impl Eq for HotKey {}

impl Hash for HotKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
        self.modifiers.hash(state);
    }
}

impl fmt::Display for HotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (modifier, name) in MODIFIER_NAMES {
            if self.modifiers.contains(modifier) {
                write!(f, "{}+", name)?;
            }
        }
        match keys::key_name(self.key) {
            Some(name) => f.write_str(&name),
            None => write!(f, "{:#04X}", self.key),
        }
    }
}

impl FromStr for HotKey {
    type Err = Error;

    /// Parse `Ctrl+Alt+F1` style text. Modifier order does not matter, the
    /// key comes last.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidHotKey(s.to_string());

        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key_name = parts.pop().filter(|k| !k.is_empty()).ok_or_else(invalid)?;

        let mut modifiers = Modifiers::NONE;
        for part in parts {
            modifiers |= parse_modifier(part).ok_or_else(invalid)?;
        }
        let key = keys::parse_key(key_name).ok_or_else(invalid)?;

        Ok(HotKey::new(key, modifiers))
    }
}

//! Synthetic keyboard input delivered to the focused window.
//!
//! Two delivery mechanisms sit behind [`KeyboardDriver`]:
//! - primary: Unicode-aware `SendInput` events that can type any character;
//! - alternate: legacy `keybd_event` virtual-key events, which need a
//!   character to virtual-key translation and are sometimes the only thing a
//!   full-screen game accepts.

pub mod keys;
#[cfg(test)]
pub(crate) mod mock;
mod synthesizer;
#[cfg(target_os = "windows")]
mod win32;

pub use synthesizer::InputSynthesizer;
#[cfg(target_os = "windows")]
pub use win32::SendInputDriver;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::Result;

/// Which mechanism delivers key events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeliveryMethod {
    /// Primary first, alternate when the primary reports an error
    #[default]
    Auto,
    /// Primary only
    Unicode,
    /// Alternate only
    VirtualKey,
}

/// A character translated for the legacy mechanism
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub vk: u16,
    pub shift: bool,
}

impl KeyStroke {
    /// Decode a `VkKeyScanW` result: low byte is the key, bit 0 of the high
    /// byte is Shift, -1 means the layout cannot produce the character.
    pub fn from_vk_scan(scan: i16) -> Option<Self> {
        if scan == -1 {
            return None;
        }
        let [low, high] = (scan as u16).to_le_bytes();
        Some(Self {
            vk: u16::from(low),
            shift: high & 0x01 != 0,
        })
    }
}

/// Low-level key event sink
pub trait KeyboardDriver {
    /// Press and release one UTF-16 code unit (primary)
    fn send_unicode(&self, unit: u16) -> Result<()>;

    /// Press and release one virtual key (primary)
    fn send_virtual_key(&self, vk: u16) -> Result<()>;

    /// Translate a UTF-16 code unit for the alternate mechanism
    fn translate(&self, unit: u16) -> Option<KeyStroke>;

    /// One legacy key-down or key-up event (alternate)
    fn legacy_key(&self, vk: u16, up: bool) -> Result<()>;
}

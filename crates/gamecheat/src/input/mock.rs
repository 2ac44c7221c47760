//! Keyboard driver that records events instead of sending them.

use std::cell::{Cell, RefCell};

use super::{KeyStroke, KeyboardDriver, keys};
use crate::error::{Error, Result};

/// An event the driver accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Unicode(u16),
    VirtualKey(u16),
    Legacy { vk: u16, up: bool },
}

/// US-layout recording driver.
///
/// Rejected events are not recorded.
#[derive(Debug, Default)]
pub struct RecordingDriver {
    events: RefCell<Vec<KeyEvent>>,
    primary_failures: Cell<usize>,
    failing_legacy_vk: Option<u16>,
    rejected: Cell<usize>,
}

impl RecordingDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject the next `n` primary-mechanism calls
    pub fn fail_primary(self, n: usize) -> Self {
        self.primary_failures.set(n);
        self
    }

    /// Reject every legacy event for `vk`
    pub fn fail_legacy_vk(mut self, vk: u16) -> Self {
        self.failing_legacy_vk = Some(vk);
        self
    }

    pub fn events(&self) -> Vec<KeyEvent> {
        self.events.borrow().clone()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    /// How many calls were rejected so far
    pub fn rejected(&self) -> usize {
        self.rejected.get()
    }

    fn primary(&self, event: KeyEvent) -> Result<()> {
        let remaining = self.primary_failures.get();
        if remaining > 0 {
            self.primary_failures.set(remaining - 1);
            return self.reject();
        }
        self.events.borrow_mut().push(event);
        Ok(())
    }

    fn reject(&self) -> Result<()> {
        self.rejected.set(self.rejected.get() + 1);
        Err(Error::InputRejected {
            sent: 0,
            expected: 2,
        })
    }
}

impl KeyboardDriver for RecordingDriver {
    fn send_unicode(&self, unit: u16) -> Result<()> {
        self.primary(KeyEvent::Unicode(unit))
    }

    fn send_virtual_key(&self, vk: u16) -> Result<()> {
        self.primary(KeyEvent::VirtualKey(vk))
    }

    fn translate(&self, unit: u16) -> Option<KeyStroke> {
        let c = char::from_u32(u32::from(unit))?;
        let (vk, shift) = match c {
            'a'..='z' => (c.to_ascii_uppercase() as u16, false),
            'A'..='Z' | '0'..='9' => (c as u16, c.is_ascii_uppercase()),
            ' ' => (keys::SPACE, false),
            '!' => (keys::KEY_0 + 1, true),
            _ => return None,
        };
        Some(KeyStroke { vk, shift })
    }

    fn legacy_key(&self, vk: u16, up: bool) -> Result<()> {
        if self.failing_legacy_vk == Some(vk) {
            return self.reject();
        }
        self.events.borrow_mut().push(KeyEvent::Legacy { vk, up });
        Ok(())
    }
}

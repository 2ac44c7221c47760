use windows::Win32::UI::Input::KeyboardAndMouse::{
    INPUT, INPUT_0, INPUT_KEYBOARD, KEYBD_EVENT_FLAGS, KEYBDINPUT, KEYEVENTF_KEYUP,
    KEYEVENTF_UNICODE, SendInput, VIRTUAL_KEY, VkKeyScanW, keybd_event,
};

use super::{KeyStroke, KeyboardDriver};
use crate::error::{Error, Result};

fn keyboard_input(vk: u16, scan: u16, flags: KEYBD_EVENT_FLAGS) -> INPUT {
    INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(vk),
                wScan: scan,
                dwFlags: flags,
                time: 0,
                dwExtraInfo: 0,
            },
        },
    }
}

/// Send a down/up pair in one call; every event must be accepted
fn send_pair(down: INPUT, up: INPUT) -> Result<()> {
    let inputs = [down, up];
    // SAFETY: `inputs` is a valid slice of fully initialised INPUT structs.
    let sent = unsafe { SendInput(&inputs, std::mem::size_of::<INPUT>() as i32) };
    if sent as usize != inputs.len() {
        return Err(Error::InputRejected {
            sent,
            expected: inputs.len() as u32,
        });
    }
    Ok(())
}

/// [`KeyboardDriver`] backed by `SendInput` and `keybd_event`
#[derive(Debug, Default, Clone, Copy)]
pub struct SendInputDriver;

impl KeyboardDriver for SendInputDriver {
    fn send_unicode(&self, unit: u16) -> Result<()> {
        send_pair(
            keyboard_input(0, unit, KEYEVENTF_UNICODE),
            keyboard_input(0, unit, KEYEVENTF_UNICODE | KEYEVENTF_KEYUP),
        )
    }

    fn send_virtual_key(&self, vk: u16) -> Result<()> {
        send_pair(
            keyboard_input(vk, 0, KEYBD_EVENT_FLAGS(0)),
            keyboard_input(vk, 0, KEYEVENTF_KEYUP),
        )
    }

    fn translate(&self, unit: u16) -> Option<KeyStroke> {
        // SAFETY: VkKeyScanW only reads the current keyboard layout.
        KeyStroke::from_vk_scan(unsafe { VkKeyScanW(unit) })
    }

    fn legacy_key(&self, vk: u16, up: bool) -> Result<()> {
        let flags = if up {
            KEYEVENTF_KEYUP
        } else {
            KEYBD_EVENT_FLAGS(0)
        };
        // Virtual-key codes fit in one byte; keybd_event reports no errors.
        // SAFETY: keybd_event has no memory-safety preconditions.
        unsafe { keybd_event(vk as u8, 0, flags, 0) };
        Ok(())
    }
}

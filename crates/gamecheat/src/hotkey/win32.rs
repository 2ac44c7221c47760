use std::ffi::c_void;

use tracing::{debug, warn};
use windows::Win32::Foundation::{HWND, LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    HOT_KEY_MODIFIERS, MOD_NOREPEAT, RegisterHotKey, UnregisterHotKey,
};
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, MSG, PostThreadMessageW, TranslateMessage, WM_QUIT,
};

use super::{HotKeyHost, HotKeyRegistrar, Modifiers, WM_HOTKEY};
use crate::error::{Error, Result};
use crate::window::WindowHandle;

fn call_failed(call: &'static str, e: windows::core::Error) -> Error {
    Error::SystemCallFailed {
        call,
        message: e.to_string(),
    }
}

/// Registers hotkeys with user32.
///
/// With [`WindowHandle::NULL`] the `WM_HOTKEY` messages go to the queue of
/// the registering thread, which must then run [`run_message_loop`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32HotKeyHost {
    window: WindowHandle,
}

impl Win32HotKeyHost {
    pub fn new(window: WindowHandle) -> Self {
        Self { window }
    }

    /// Deliver presses to the calling thread's message queue
    pub fn for_current_thread() -> Self {
        Self::new(WindowHandle::NULL)
    }

    fn hwnd(&self) -> HWND {
        HWND(self.window.raw() as *mut c_void)
    }
}

impl HotKeyHost for Win32HotKeyHost {
    fn bind(&self, id: i32, modifiers: Modifiers, key: u16) -> Result<()> {
        // MOD_NOREPEAT: holding the chord fires once
        let flags = HOT_KEY_MODIFIERS(modifiers.bits() | MOD_NOREPEAT.0);
        // SAFETY: RegisterHotKey validates its arguments and reports failure.
        unsafe { RegisterHotKey(self.hwnd(), id, flags, u32::from(key)) }
            .map_err(|e| call_failed("RegisterHotKey", e))
    }

    fn release(&self, id: i32) -> Result<()> {
        // SAFETY: UnregisterHotKey validates its arguments and reports failure.
        unsafe { UnregisterHotKey(self.hwnd(), id) }
            .map_err(|e| call_failed("UnregisterHotKey", e))
    }
}

pub fn current_thread_id() -> u32 {
    // SAFETY: GetCurrentThreadId is always safe to call.
    unsafe { GetCurrentThreadId() }
}

/// Pump the calling thread's message queue until `WM_QUIT`.
///
/// Hotkey presses are routed to `registrar` on this thread; everything else
/// is dispatched normally.
pub fn run_message_loop(registrar: &HotKeyRegistrar<Win32HotKeyHost>) -> Result<()> {
    let mut msg = MSG::default();
    loop {
        // SAFETY: `msg` is a valid out pointer; a null HWND reads both window
        // and thread messages.
        let status = unsafe { GetMessageW(&mut msg, HWND(std::ptr::null_mut()), 0, 0) };
        match status.0 {
            0 => {
                debug!("Message loop received WM_QUIT");
                return Ok(());
            }
            -1 => {
                let e = windows::core::Error::from_win32();
                warn!("GetMessageW failed: {}", e);
                return Err(call_failed("GetMessageW", e));
            }
            _ => {}
        }

        if msg.message == WM_HOTKEY && registrar.handle_message(msg.message, msg.wParam.0) {
            continue;
        }
        // SAFETY: `msg` was filled by GetMessageW.
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }
}

/// Ask the message loop on `thread_id` to return
pub fn post_quit(thread_id: u32) -> Result<()> {
    // SAFETY: PostThreadMessageW only enqueues a message.
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
        .map_err(|e| call_failed("PostThreadMessageW", e))
}

//! Win32 window system.

use std::ffi::c_void;

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    GetMonitorInfoW, MONITOR_DEFAULTTONEAREST, MONITORINFO, MonitorFromWindow,
};
use windows::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetForegroundWindow, GetWindowRect, GetWindowThreadProcessId, IsIconic,
    IsWindowVisible, SW_RESTORE, SW_SHOW, SetForegroundWindow, ShowWindow,
};

use super::{Rect, WindowHandle, WindowSystem};
use crate::error::{Error, Result};

fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut c_void)
}

fn handle(hwnd: HWND) -> WindowHandle {
    WindowHandle::from_raw(hwnd.0 as isize)
}

fn rect(r: RECT) -> Rect {
    Rect::new(r.left, r.top, r.right, r.bottom)
}

fn call_failed(call: &'static str) -> Error {
    Error::SystemCallFailed {
        call,
        message: windows::core::Error::from_win32().to_string(),
    }
}

/// [`WindowSystem`] backed by user32
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32Windows;

impl WindowSystem for Win32Windows {
    fn is_minimized(&self, window: WindowHandle) -> bool {
        // SAFETY: IsIconic accepts any HWND value.
        unsafe { IsIconic(hwnd(window)).as_bool() }
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        let mut r = RECT::default();
        // SAFETY: `r` is a valid out pointer for the duration of the call.
        unsafe { GetWindowRect(hwnd(window), &mut r) }.ok()?;
        Some(rect(r))
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        // SAFETY: MonitorFromWindow returns the nearest monitor for any HWND.
        let monitor = unsafe { MonitorFromWindow(hwnd(window), MONITOR_DEFAULTTONEAREST) };
        if monitor.is_invalid() {
            return None;
        }

        let mut info = MONITORINFO {
            cbSize: std::mem::size_of::<MONITORINFO>() as u32,
            ..Default::default()
        };
        // SAFETY: `info` is sized correctly and outlives the call.
        let ok = unsafe { GetMonitorInfoW(monitor, &mut info) };
        ok.as_bool().then(|| rect(info.rcMonitor))
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        // SAFETY: ShowWindow accepts any HWND; the return value is the previous
        // visibility, not an error indicator.
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_RESTORE);
        }
        Ok(())
    }

    fn show(&self, window: WindowHandle) -> Result<()> {
        // SAFETY: see `restore`.
        unsafe {
            let _ = ShowWindow(hwnd(window), SW_SHOW);
        }
        Ok(())
    }

    fn foreground_window(&self) -> WindowHandle {
        // SAFETY: GetForegroundWindow is always safe to call.
        handle(unsafe { GetForegroundWindow() })
    }

    fn window_thread(&self, window: WindowHandle) -> Option<u32> {
        // SAFETY: the process id out parameter is optional and omitted.
        let thread = unsafe { GetWindowThreadProcessId(hwnd(window), None) };
        (thread != 0).then_some(thread)
    }

    fn current_thread(&self) -> u32 {
        // SAFETY: GetCurrentThreadId is always safe to call.
        unsafe { GetCurrentThreadId() }
    }

    fn attach_thread_input(&self, from: u32, to: u32, attach: bool) -> Result<()> {
        // SAFETY: AttachThreadInput validates both thread ids itself.
        let ok = unsafe { AttachThreadInput(from, to, attach) };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(call_failed("AttachThreadInput"))
        }
    }

    fn set_foreground(&self, window: WindowHandle) -> Result<()> {
        // SAFETY: SetForegroundWindow accepts any HWND; the OS may refuse.
        let ok = unsafe { SetForegroundWindow(hwnd(window)) };
        if ok.as_bool() {
            Ok(())
        } else {
            Err(call_failed("SetForegroundWindow"))
        }
    }
}

struct WindowSearch {
    pid: u32,
    found: Option<HWND>,
}

/// Find the first visible top-level window owned by `pid`
pub fn find_window_by_pid(pid: u32) -> Option<WindowHandle> {
    let mut search = WindowSearch { pid, found: None };

    // SAFETY: `search` outlives the enumeration and the callback is the only
    // code that dereferences the pointer.
    unsafe {
        let _ = EnumWindows(
            Some(enum_callback),
            LPARAM(&mut search as *mut WindowSearch as isize),
        );
    }

    search.found.map(handle)
}

unsafe extern "system" fn enum_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam was built from a live `&mut WindowSearch` above.
    let search = unsafe { &mut *(lparam.0 as *mut WindowSearch) };

    let mut window_pid = 0u32;
    unsafe { GetWindowThreadProcessId(hwnd, Some(&mut window_pid)) };

    if window_pid == search.pid && unsafe { IsWindowVisible(hwnd) }.as_bool() {
        search.found = Some(hwnd);
        return BOOL(0); // Stop enumeration
    }
    BOOL(1)
}

//! Game window inspection and activation.
//!
//! Window state is never cached: minimized, foreground and full-screen are
//! computed from the OS on every query. All OS access goes through
//! [`WindowSystem`].

mod activation;
#[cfg(test)]
pub(crate) mod mock;
#[cfg(target_os = "windows")]
mod win32;

pub use activation::{InputAttachGuard, activate};
#[cfg(target_os = "windows")]
pub use win32::{Win32Windows, find_window_by_pid};

use std::fmt;

use crate::error::Result;

/// Opaque top-level window handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WindowHandle(isize);

impl WindowHandle {
    pub const NULL: Self = Self(0);

    pub const fn from_raw(raw: isize) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> isize {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Screen rectangle in pixels, right/bottom exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn width(&self) -> i32 {
        self.right - self.left
    }

    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// The window operations the activation protocol needs.
///
/// Fallible commands return `Err` when the OS rejects them; queries answer
/// `None`/`false` for handles the OS does not recognise.
pub trait WindowSystem {
    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn window_rect(&self, window: WindowHandle) -> Option<Rect>;

    /// Bounds of the monitor nearest to `window`
    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect>;

    fn restore(&self, window: WindowHandle) -> Result<()>;

    fn show(&self, window: WindowHandle) -> Result<()>;

    fn foreground_window(&self) -> WindowHandle;

    /// Thread that created `window`
    fn window_thread(&self, window: WindowHandle) -> Option<u32>;

    fn current_thread(&self) -> u32;

    fn attach_thread_input(&self, from: u32, to: u32, attach: bool) -> Result<()>;

    fn set_foreground(&self, window: WindowHandle) -> Result<()>;
}

/// Exact-equality full-screen test: same size and same top-left corner.
pub fn covers_monitor(window: Rect, monitor: Rect) -> bool {
    window.width() == monitor.width()
        && window.height() == monitor.height()
        && window.left == monitor.left
        && window.top == monitor.top
}

/// Whether `window` fills its monitor. Minimized or unknown windows never do.
pub fn is_full_screen<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> bool {
    if window.is_null() || system.is_minimized(window) {
        return false;
    }
    match (system.window_rect(window), system.monitor_rect(window)) {
        (Some(rect), Some(monitor)) => covers_monitor(rect, monitor),
        _ => false,
    }
}

/// Whether the OS still knows `window`
pub fn is_window_valid<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> bool {
    !window.is_null() && system.window_rect(window).is_some()
}

/// Snapshot of a window's state, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowState {
    pub minimized: bool,
    pub foreground: bool,
    pub full_screen: bool,
}

impl WindowState {
    pub fn query<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> Self {
        Self {
            minimized: system.is_minimized(window),
            foreground: system.foreground_window() == window,
            full_screen: is_full_screen(system, window),
        }
    }
}

impl fmt::Display for WindowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minimized: {}, full-screen: {}, foreground: {}",
            self.minimized, self.full_screen, self.foreground
        )
    }
}

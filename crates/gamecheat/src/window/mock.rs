//! Scriptable window system for activation and executor tests.

use std::cell::{Cell, RefCell};

use super::{Rect, WindowHandle, WindowSystem};
use crate::error::{Error, Result};

/// Commands issued against the mock, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCall {
    Restore,
    Show,
    SetForeground,
    AttachInput { from: u32, to: u32 },
    DetachInput { from: u32, to: u32 },
}

/// One game window on one 1920x1080 monitor.
///
/// By default the window is windowed (800x600), owned by another thread and
/// takes focus on the first `SetForeground`.
#[derive(Debug)]
pub struct MockWindows {
    window_rect: Option<Rect>,
    monitor_rect: Rect,
    window_thread: u32,
    current_thread: u32,
    minimized: Cell<bool>,
    foreground: Cell<WindowHandle>,
    /// `SetForeground` calls still to be ignored; `None` ignores all of them
    focus_after: Cell<Option<u32>>,
    show_focuses: bool,
    attach_fails: bool,
    calls: RefCell<Vec<WindowCall>>,
    queries: Cell<usize>,
}

impl MockWindows {
    pub const GAME: WindowHandle = WindowHandle::from_raw(0x1000);
    pub const OTHER: WindowHandle = WindowHandle::from_raw(0x2000);
    pub const GAME_THREAD: u32 = 77;
    pub const OWN_THREAD: u32 = 1;

    pub fn new() -> Self {
        Self {
            window_rect: Some(Rect::new(0, 0, 800, 600)),
            monitor_rect: Rect::new(0, 0, 1920, 1080),
            window_thread: Self::GAME_THREAD,
            current_thread: Self::OWN_THREAD,
            minimized: Cell::new(false),
            foreground: Cell::new(Self::OTHER),
            focus_after: Cell::new(Some(0)),
            show_focuses: false,
            attach_fails: false,
            calls: RefCell::new(Vec::new()),
            queries: Cell::new(0),
        }
    }

    pub fn with_window_rect(mut self, rect: Rect) -> Self {
        self.window_rect = Some(rect);
        self
    }

    pub fn full_screen(self) -> Self {
        let monitor = self.monitor_rect;
        self.with_window_rect(monitor)
    }

    pub fn minimized(self) -> Self {
        self.minimized.set(true);
        self
    }

    pub fn focused(self) -> Self {
        self.foreground.set(Self::GAME);
        self
    }

    /// Ignore the first `n` `SetForeground` calls
    pub fn focus_after(self, n: u32) -> Self {
        self.focus_after.set(Some(n));
        self
    }

    pub fn never_focus(self) -> Self {
        self.focus_after.set(None);
        self
    }

    /// `ShowWindow` brings the window to the front
    pub fn show_focuses(mut self) -> Self {
        self.show_focuses = true;
        self
    }

    pub fn same_thread(mut self) -> Self {
        self.window_thread = self.current_thread;
        self
    }

    pub fn attach_fails(mut self) -> Self {
        self.attach_fails = true;
        self
    }

    pub fn calls(&self) -> Vec<WindowCall> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, call: WindowCall) -> usize {
        self.calls.borrow().iter().filter(|c| **c == call).count()
    }

    /// Every interaction, queries included
    pub fn interactions(&self) -> usize {
        self.queries.get() + self.calls.borrow().len()
    }

    fn query(&self) {
        self.queries.set(self.queries.get() + 1);
    }

    fn record(&self, call: WindowCall) {
        self.calls.borrow_mut().push(call);
    }

    fn known(&self, window: WindowHandle) -> bool {
        window == Self::GAME && self.window_rect.is_some()
    }
}

fn refused() -> Error {
    Error::SystemCallFailed {
        call: "SetForegroundWindow",
        message: "foreground lock".to_string(),
    }
}

impl WindowSystem for MockWindows {
    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.query();
        self.known(window) && self.minimized.get()
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        self.query();
        self.known(window).then_some(self.window_rect).flatten()
    }

    fn monitor_rect(&self, window: WindowHandle) -> Option<Rect> {
        self.query();
        self.known(window).then_some(self.monitor_rect)
    }

    fn restore(&self, _window: WindowHandle) -> Result<()> {
        self.record(WindowCall::Restore);
        self.minimized.set(false);
        Ok(())
    }

    fn show(&self, window: WindowHandle) -> Result<()> {
        self.record(WindowCall::Show);
        if self.show_focuses {
            self.foreground.set(window);
        }
        Ok(())
    }

    fn foreground_window(&self) -> WindowHandle {
        self.query();
        self.foreground.get()
    }

    fn window_thread(&self, window: WindowHandle) -> Option<u32> {
        self.query();
        self.known(window).then_some(self.window_thread)
    }

    fn current_thread(&self) -> u32 {
        self.query();
        self.current_thread
    }

    fn attach_thread_input(&self, from: u32, to: u32, attach: bool) -> Result<()> {
        if attach {
            self.record(WindowCall::AttachInput { from, to });
            if self.attach_fails {
                return Err(Error::SystemCallFailed {
                    call: "AttachThreadInput",
                    message: "access denied".to_string(),
                });
            }
        } else {
            self.record(WindowCall::DetachInput { from, to });
        }
        Ok(())
    }

    fn set_foreground(&self, window: WindowHandle) -> Result<()> {
        self.record(WindowCall::SetForeground);
        match self.focus_after.get() {
            Some(0) => {
                self.foreground.set(window);
                Ok(())
            }
            Some(n) => {
                self.focus_after.set(Some(n - 1));
                Err(refused())
            }
            None => Err(refused()),
        }
    }
}

//! Foreground activation with restore, thread-input attach and retries.

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{WindowHandle, WindowState, WindowSystem, is_full_screen};
use crate::config::ActivationConfig;
use crate::error::{Error, Result};

/// Input queues of two threads attached for as long as the guard lives.
///
/// Dropping the guard detaches them again, on every exit path.
pub struct InputAttachGuard<'a, S: WindowSystem + ?Sized> {
    system: &'a S,
    from: u32,
    to: u32,
}

impl<'a, S: WindowSystem + ?Sized> InputAttachGuard<'a, S> {
    pub fn attach(system: &'a S, from: u32, to: u32) -> Result<Self> {
        system.attach_thread_input(from, to, true)?;
        Ok(Self { system, from, to })
    }
}

impl<S: WindowSystem + ?Sized> Drop for InputAttachGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.system.attach_thread_input(self.from, self.to, false) {
            warn!("Failed to detach thread input {} -> {}: {}", self.from, self.to, e);
        }
    }
}

/// Ask for the foreground, attaching to the window's input queue when it
/// belongs to another thread. An attach failure is not fatal.
fn request_foreground<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> Result<()> {
    let current = system.current_thread();
    let _guard = match system.window_thread(window) {
        Some(target) if target != 0 && target != current => {
            match InputAttachGuard::attach(system, current, target) {
                Ok(guard) => Some(guard),
                Err(e) => {
                    debug!("Thread input attach failed: {}", e);
                    None
                }
            }
        }
        _ => None,
    };
    system.set_foreground(window)
}

fn is_foreground<S: WindowSystem + ?Sized>(system: &S, window: WindowHandle) -> bool {
    system.foreground_window() == window
}

/// Bring `window` to the foreground.
///
/// Each attempt restores a minimized window, requests the foreground and
/// verifies it after a delay (longer for full-screen windows, which also get
/// a plain show-window nudge when the request did not stick). OS failures
/// only fail the current attempt. Returns [`Error::ActivationFailed`] once
/// `config.max_retries` attempts are used up.
pub async fn activate<S: WindowSystem + ?Sized>(
    system: &S,
    window: WindowHandle,
    config: &ActivationConfig,
) -> Result<()> {
    if window.is_null() {
        return Err(Error::InvalidWindow);
    }

    let attempts = config.max_retries.max(1);
    for attempt in 1..=attempts {
        debug!(
            "Activation attempt {}/{} ({})",
            attempt,
            attempts,
            WindowState::query(system, window)
        );

        if system.is_minimized(window) {
            debug!("Restoring minimized window {}", window);
            if let Err(e) = system.restore(window) {
                debug!("Restore failed: {}", e);
            }
            sleep(config.restore_delay()).await;
        }

        let full_screen = is_full_screen(system, window);

        if let Err(e) = request_foreground(system, window) {
            debug!("Foreground request failed: {}", e);
        }

        sleep(config.verify_delay(full_screen)).await;
        if is_foreground(system, window) {
            info!("Window {} activated (attempt {}/{})", window, attempt, attempts);
            return Ok(());
        }

        if full_screen {
            debug!("Full-screen window did not take focus, trying show");
            if let Err(e) = system.show(window) {
                debug!("Show failed: {}", e);
            }
            sleep(config.show_window_delay()).await;
            if is_foreground(system, window) {
                info!("Window {} activated by show (attempt {}/{})", window, attempt, attempts);
                return Ok(());
            }
        }

        if attempt < attempts {
            sleep(config.retry_delay()).await;
        }
    }

    warn!("Window {} activation failed after {} attempts", window, attempts);
    Err(Error::ActivationFailed { attempts })
}

//! Cancellable periodic work on a dedicated thread.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, warn};

/// One-way latch shared between a loop and whoever ends it.
///
/// Once triggered it stays triggered, and every thread sleeping in
/// [`wait`](Self::wait) or [`wait_forever`](Self::wait_forever) wakes at once.
#[derive(Debug, Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        *self.lock() = true;
        self.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.lock()
    }

    /// Sleep for up to `timeout`. Returns `true` if the signal fired before or
    /// during the sleep.
    pub fn wait(&self, timeout: Duration) -> bool {
        let stopped = self.lock();
        let (stopped, _) = self
            .wake
            .wait_timeout_while(stopped, timeout, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *stopped
    }

    /// Block until the signal fires
    pub fn wait_forever(&self) {
        let stopped = self.lock();
        let _stopped = self
            .wake
            .wait_while(stopped, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
    }

    fn lock(&self) -> MutexGuard<'_, bool> {
        self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// What a tick wants the loop to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Continue,
    Stop,
}

/// A closure run on a fixed period until stopped.
///
/// The first tick fires one full period after [`spawn`](Self::spawn). Stopping
/// wakes the thread immediately; a tick already in progress runs to completion.
pub struct RepeatingTask {
    name: String,
    signal: Arc<StopSignal>,
    handle: Option<JoinHandle<()>>,
}

impl RepeatingTask {
    pub fn spawn<F>(name: impl Into<String>, period: Duration, mut tick: F) -> std::io::Result<Self>
    where
        F: FnMut() -> TickOutcome + Send + 'static,
    {
        let name = name.into();
        let signal = Arc::new(StopSignal::new());
        let thread_signal = Arc::clone(&signal);
        let thread_name = name.clone();

        let handle = thread::Builder::new().name(name.clone()).spawn(move || {
            while !thread_signal.wait(period) {
                if tick() == TickOutcome::Stop {
                    debug!("{} finished by itself", thread_name);
                    break;
                }
            }
        })?;

        debug!("{} started ({:?} period)", name, period);
        Ok(Self {
            name,
            signal,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the loop has exited, either by stop or by its own choice
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Stop the loop and wait for the thread to exit.
    ///
    /// Safe to call repeatedly and from inside the tick itself.
    pub fn stop(&mut self) {
        self.signal.trigger();
        let Some(handle) = self.handle.take() else {
            return;
        };
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if handle.join().is_err() {
            warn!("{} panicked", self.name);
        }
    }
}

impl Drop for RepeatingTask {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for RepeatingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepeatingTask")
            .field("name", &self.name)
            .field("finished", &self.is_finished())
            .finish()
    }
}

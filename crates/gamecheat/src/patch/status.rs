use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

type Subscriber = Box<dyn Fn(bool) + Send + Sync>;

/// Observable "is active" flag.
///
/// Subscribers are called on the thread that changed the value, and only when
/// it actually changes.
#[derive(Default)]
pub struct StatusFlag {
    value: AtomicBool,
    subscribers: Mutex<Vec<Subscriber>>,
}

impl StatusFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.value.load(Ordering::SeqCst)
    }

    /// Store `value`, notifying subscribers if it differs from the previous one.
    ///
    /// Returns whether a transition happened.
    pub fn set(&self, value: bool) -> bool {
        if self.value.swap(value, Ordering::SeqCst) == value {
            return false;
        }
        let subscribers = self.subscribers.lock().unwrap_or_else(PoisonError::into_inner);
        for subscriber in subscribers.iter() {
            subscriber(value);
        }
        true
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Box::new(callback));
    }
}

impl std::fmt::Debug for StatusFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("StatusFlag").field(&self.get()).finish()
    }
}

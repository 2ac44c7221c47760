use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::{HotKey, Modifiers};
use crate::error::{Error, Result};

/// Window message carrying a hotkey id in `wParam`
pub const WM_HOTKEY: u32 = 0x0312;

/// OS side of hotkey registration
pub trait HotKeyHost {
    /// Bind `id` to the chord; fails when another application owns it
    fn bind(&self, id: i32, modifiers: Modifiers, key: u16) -> Result<()>;

    fn release(&self, id: i32) -> Result<()>;
}

type Subscriber = Box<dyn Fn(&HotKey)>;

/// Tracks the hotkeys registered on one host and dispatches their presses.
///
/// Ids are allocated sequentially from 1 and only consumed by successful
/// registrations. Chord conflicts are checked against this registrar only;
/// conflicts with other applications surface as bind failures.
pub struct HotKeyRegistrar<H: HotKeyHost> {
    host: H,
    registered: BTreeMap<i32, HotKey>,
    next_id: i32,
    subscribers: Vec<Subscriber>,
    detached: bool,
}

impl<H: HotKeyHost> HotKeyRegistrar<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            registered: BTreeMap::new(),
            next_id: 1,
            subscribers: Vec::new(),
            detached: false,
        }
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Register `hotkey` and stamp its id on success
    pub fn register(&mut self, hotkey: &mut HotKey) -> Result<i32> {
        if self.registered.values().any(|h| h.is_same_chord(hotkey)) {
            warn!("Hotkey {} is already registered", hotkey);
            return Err(Error::HotKeyConflict(hotkey.to_string()));
        }

        let id = self.next_id;
        if let Err(e) = self.host.bind(id, hotkey.modifiers, hotkey.key) {
            warn!("Failed to register hotkey {}: {}", hotkey, e);
            return Err(Error::HotKeyRegistrationFailed {
                hotkey: hotkey.to_string(),
                message: e.to_string(),
            });
        }

        self.next_id += 1;
        hotkey.id = Some(id);
        self.registered.insert(id, hotkey.clone());
        info!("Registered hotkey {} (id {})", hotkey, id);
        Ok(id)
    }

    /// Release `hotkey`'s binding and clear its id
    pub fn unregister(&mut self, hotkey: &mut HotKey) -> Result<()> {
        let Some(id) = hotkey.id.filter(|id| self.registered.contains_key(id)) else {
            warn!("Hotkey {} is not registered", hotkey);
            return Err(Error::HotKeyNotRegistered(hotkey.to_string()));
        };

        self.release(id)?;
        hotkey.id = None;
        Ok(())
    }

    fn release(&mut self, id: i32) -> Result<()> {
        let Some(hotkey) = self.registered.get(&id) else {
            return Err(Error::HotKeyNotRegistered(format!("id {}", id)));
        };
        if let Err(e) = self.host.release(id) {
            warn!("Failed to unregister hotkey {}: {}", hotkey, e);
            return Err(e);
        }
        info!("Unregistered hotkey {} (id {})", hotkey, id);
        self.registered.remove(&id);
        Ok(())
    }

    /// Unregister everything; returns how many bindings were released
    pub fn unregister_all(&mut self) -> usize {
        let ids: Vec<i32> = self.registered.keys().copied().collect();
        let released = ids.into_iter().filter(|id| self.release(*id).is_ok()).count();
        debug!("Released {} hotkeys", released);
        released
    }

    /// Call `callback` for every hotkey press
    pub fn on_hotkey<F>(&mut self, callback: F)
    where
        F: Fn(&HotKey) + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    /// Route one window message.
    ///
    /// Returns `true` when it was a press of a hotkey registered here, after
    /// notifying every subscriber once.
    pub fn handle_message(&self, message: u32, wparam: usize) -> bool {
        if self.detached || message != WM_HOTKEY {
            return false;
        }
        let Some(hotkey) = i32::try_from(wparam)
            .ok()
            .and_then(|id| self.registered.get(&id))
        else {
            return false;
        };

        debug!("Hotkey pressed: {}", hotkey);
        for subscriber in &self.subscribers {
            subscriber(hotkey);
        }
        true
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// Live registrations in id order
    pub fn registered(&self) -> impl Iterator<Item = &HotKey> {
        self.registered.values()
    }

    /// Unregister everything and stop dispatching
    pub fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.unregister_all();
        self.subscribers.clear();
        self.detached = true;
        info!("Hotkey registrar detached");
    }
}

impl<H: HotKeyHost> Drop for HotKeyRegistrar<H> {
    fn drop(&mut self) {
        self.detach();
    }
}

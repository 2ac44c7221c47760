use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use super::{HotKeyHost, Modifiers};
use crate::error::{Error, Result};

type Bindings = Rc<RefCell<BTreeMap<i32, (Modifiers, u16)>>>;

/// Host that keeps bindings in a shared map so tests can inspect them after
/// the registrar is gone
#[derive(Debug, Default)]
pub struct MockHotKeyHost {
    bindings: Bindings,
    refused: Vec<(u16, Modifiers)>,
}

impl MockHotKeyHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend another application owns this chord
    pub fn refuse(mut self, key: u16, modifiers: Modifiers) -> Self {
        self.refused.push((key, modifiers));
        self
    }

    pub fn bindings(&self) -> Bindings {
        Rc::clone(&self.bindings)
    }

    /// Bound ids in ascending order
    pub fn bound(&self) -> Vec<i32> {
        self.bindings.borrow().keys().copied().collect()
    }
}

impl HotKeyHost for MockHotKeyHost {
    fn bind(&self, id: i32, modifiers: Modifiers, key: u16) -> Result<()> {
        if self.refused.contains(&(key, modifiers)) {
            return Err(Error::SystemCallFailed {
                call: "RegisterHotKey",
                message: "hot key is already registered".to_string(),
            });
        }
        self.bindings.borrow_mut().insert(id, (modifiers, key));
        Ok(())
    }

    fn release(&self, id: i32) -> Result<()> {
        match self.bindings.borrow_mut().remove(&id) {
            Some(_) => Ok(()),
            None => Err(Error::HotKeyNotRegistered(format!("id {}", id))),
        }
    }
}

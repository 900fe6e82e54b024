use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::bind::{Bindable, BindableKind};

use super::DrawableKind;

/// Shared bindables of one drawable kind.
#[derive(Default)]
pub struct StaticSlot {
    binds: RefCell<Vec<Rc<dyn Bindable>>>,
    claimed: Cell<bool>,
}

impl StaticSlot {
    pub fn len(&self) -> usize {
        self.binds.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.binds.borrow().is_empty()
    }

    /// Snapshot of the shared list, in insertion order.
    pub fn binds(&self) -> Vec<Rc<dyn Bindable>> {
        self.binds.borrow().clone()
    }

    pub(crate) fn push(&self, bind: Rc<dyn Bindable>) {
        self.binds.borrow_mut().push(bind);
    }

    /// First index buffer in the list.
    pub(crate) fn index_buffer(&self) -> Option<Rc<dyn Bindable>> {
        self.binds
            .borrow()
            .iter()
            .find(|b| b.kind() == BindableKind::IndexBuffer)
            .cloned()
    }

    pub(crate) fn is_claimed(&self) -> bool {
        self.claimed.get()
    }

    pub(crate) fn claim(&self) {
        self.claimed.set(true);
    }

    /// Drops a partial initialization so another instance can retry.
    pub(crate) fn reset(&self) {
        self.binds.borrow_mut().clear();
        self.claimed.set(false);
    }
}

/// Per-device map from drawable kind to its shared bindables.
#[derive(Default)]
pub struct StaticBindRegistry {
    slots: HashMap<DrawableKind, Rc<StaticSlot>>,
}

impl StaticBindRegistry {
    pub(crate) fn slot(&mut self, kind: DrawableKind) -> Rc<StaticSlot> {
        Rc::clone(self.slots.entry(kind).or_default())
    }

    pub fn is_initialized(&self, kind: DrawableKind) -> bool {
        self.slots.get(&kind).is_some_and(|slot| !slot.is_empty())
    }

    /// Number of shared bindables registered for `kind`.
    pub fn bind_count(&self, kind: DrawableKind) -> usize {
        self.slots.get(&kind).map_or(0, |slot| slot.len())
    }
}

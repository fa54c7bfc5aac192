//! In-memory draft storage for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::DraftStore;
use crate::error::Result;

/// In-memory [`DraftStore`] used by unit and flow tests.
///
/// Clones share the same slot map, so a test can hand one handle to a
/// controller and keep another to observe or survive a simulated restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStore {
    slots: Rc<RefCell<HashMap<String, String>>>,
}

impl MemoryDraftStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of populated slots.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Whether any slot holds data.
    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }
}

impl DraftStore for MemoryDraftStore {
    fn get(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.slots.borrow().get(slot).cloned())
    }

    fn set(&mut self, slot: &str, value: &str) -> Result<()> {
        self.slots
            .borrow_mut()
            .insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: &str) -> Result<()> {
        self.slots.borrow_mut().remove(slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let mut store = MemoryDraftStore::new();
        store.set("draft", "payload").unwrap();
        assert_eq!(store.get("draft").unwrap().as_deref(), Some("payload"));
    }

    #[test]
    fn remove_clears_slot() {
        let mut store = MemoryDraftStore::new();
        store.set("step", "5").unwrap();
        store.remove("step").unwrap();
        assert!(store.get("step").unwrap().is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn missing_slot_is_none() {
        let store = MemoryDraftStore::new();
        assert!(store.get("absent").unwrap().is_none());
    }

    #[test]
    fn clones_share_slots() {
        let mut store = MemoryDraftStore::new();
        let observer = store.clone();
        store.set("draft", "payload").unwrap();
        assert_eq!(observer.get("draft").unwrap().as_deref(), Some("payload"));
    }
}

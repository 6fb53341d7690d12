//! In-memory reference [`Store`] implementation.
//!
//! Exists so this crate's own tests, doctests, and demos have a concrete
//! adapter to exercise the [`Engine`](crate::engine::Engine) against without
//! pulling in a database. A real deployment swaps this for a document-store-
//! or file-backed adapter implementing the same trait.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::{ItemPatch, Store};
use crate::container::Container;
use crate::error::{Error, Result};
use crate::item::{Item, WasteReason};
use crate::log::{ActionType, LogEntry};
use crate::Id;

#[derive(Default)]
struct Inner {
    containers: HashMap<Id, Container>,
    items: HashMap<Id, Item>,
    logs: Vec<LogEntry>,
}

/// Thread-safe, process-local [`Store`] backed by plain hash maps.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a container directly, bypassing the item/log bookkeeping.
    /// Containers are created once and never deleted by the core.
    pub fn seed_container(&self, container: Container) {
        let mut inner = self.inner.lock();
        inner.containers.insert(container.container_id.clone(), container);
    }
}

impl Store for MemoryStore {
    fn get_containers(&self) -> Result<Vec<Container>> {
        Ok(self.inner.lock().containers.values().cloned().collect())
    }

    fn get_items(&self) -> Result<Vec<Item>> {
        Ok(self.inner.lock().items.values().cloned().collect())
    }

    fn upsert_item(&self, item: Item) -> Result<()> {
        self.inner.lock().items.insert(item.item_id.clone(), item);
        Ok(())
    }

    fn update_item(&self, id: &Id, patch: ItemPatch) -> Result<()> {
        let mut inner = self.inner.lock();
        let item = inner
            .items
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("item {id} not found")))?;
        if let Some(status) = patch.status {
            item.status = status;
        }
        if let Some(container_id) = patch.container_id {
            item.container_id = container_id;
        }
        if let Some(position) = patch.position {
            item.position = position;
        }
        if let Some(remaining_uses) = patch.remaining_uses {
            item.remaining_uses = remaining_uses;
        }
        Ok(())
    }

    fn mark_waste(&self, id: &Id, reason: WasteReason) -> Result<()> {
        let mut inner = self.inner.lock();
        let item = inner
            .items
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(format!("item {id} not found")))?;
        item.mark_waste(reason);
        Ok(())
    }

    fn get_waste(&self) -> Result<Vec<Item>> {
        Ok(self
            .inner
            .lock()
            .items
            .values()
            .filter(|i| i.is_waste())
            .cloned()
            .collect())
    }

    fn append_log(&self, entry: LogEntry) -> Result<()> {
        let mut inner = self.inner.lock();
        let seq = inner.logs.len() as u64;
        inner.logs.push(LogEntry { seq, ..entry });
        Ok(())
    }

    fn read_logs(&self, action_type: Option<ActionType>) -> Result<Vec<LogEntry>> {
        Ok(self
            .inner
            .lock()
            .logs
            .iter()
            .filter(|e| action_type.map_or(true, |t| e.action_type == t))
            .cloned()
            .collect())
    }
}

//! Persistence contract: a single trait the core depends on,
//! with no bundled implementation beyond the in-memory reference adapter
//! used by this crate's own tests and demos.

pub mod memory;

use crate::container::Container;
use crate::error::Result;
use crate::item::{Item, WasteReason};
use crate::log::{ActionType, LogEntry};
use crate::Id;

/// Partial update applied by [`Store::update_item`].
#[derive(Debug, Clone, Default)]
pub struct ItemPatch {
    pub status: Option<crate::item::Status>,
    pub container_id: Option<Option<Id>>,
    pub position: Option<Option<crate::geometry::Position>>,
    pub remaining_uses: Option<u32>,
}

/// Object-safe persistence contract. Concrete adapters (document store, file,
/// in-memory) implement this; the core depends only on the trait, never on a
/// concrete backend, so it can be swapped behind `Arc<dyn Store>`.
pub trait Store: Send + Sync {
    fn get_containers(&self) -> Result<Vec<Container>>;
    fn get_items(&self) -> Result<Vec<Item>>;
    /// Idempotent insert/update by `itemId`.
    fn upsert_item(&self, item: Item) -> Result<()>;
    fn update_item(&self, id: &Id, patch: ItemPatch) -> Result<()>;
    fn mark_waste(&self, id: &Id, reason: WasteReason) -> Result<()>;
    fn get_waste(&self) -> Result<Vec<Item>>;
    fn append_log(&self, entry: LogEntry) -> Result<()>;
    fn read_logs(&self, action_type: Option<ActionType>) -> Result<Vec<LogEntry>>;
}

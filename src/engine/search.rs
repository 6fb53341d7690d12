//! Name-based lookup surface (spec §6 `search --name`). Logged unconditionally,
//! even when nothing matches (spec §7's single logging exception).

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::item::Status;
use crate::Id;

/// One matching item, reported with just enough detail to act on without a
/// second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub item_id: Id,
    pub name: String,
    pub status: Status,
    pub container_id: Option<Id>,
    pub position: Option<Position>,
}

//! Items: the things that get placed, retrieved, and eventually returned as waste.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::Id;

/// Lifecycle status of an item (§3 Lifecycle).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Stored,
    Waste,
    Disposed,
}

/// Why an item became waste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum WasteReason {
    Expired,
    OutOfUses,
}

/// A physical item: an axis-aligned box with priority, expiry, and usage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub item_id: Id,
    pub name: String,
    pub w: u32,
    pub d: u32,
    pub h: u32,
    pub mass: f64,
    /// 1..=100, higher is more important.
    pub priority: u8,
    pub expiry_date: Option<DateTime<Utc>>,
    pub usage_limit: u32,
    pub remaining_uses: u32,
    pub preferred_zone: String,
    pub status: Status,
    pub container_id: Option<Id>,
    pub position: Option<Position>,
    pub waste_reason: Option<WasteReason>,
}

impl Item {
    /// Creates a new item in `pending` status, not yet placed anywhere.
    pub fn new(
        item_id: impl Into<Id>,
        name: impl Into<String>,
        w: u32,
        d: u32,
        h: u32,
        mass: f64,
        priority: u8,
        expiry_date: Option<DateTime<Utc>>,
        usage_limit: u32,
        preferred_zone: impl Into<String>,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            name: name.into(),
            w,
            d,
            h,
            mass,
            priority,
            expiry_date,
            usage_limit,
            remaining_uses: usage_limit,
            preferred_zone: preferred_zone.into(),
            status: Status::Pending,
            container_id: None,
            position: None,
            waste_reason: None,
        }
    }

    pub fn volume(&self) -> u64 {
        self.w as u64 * self.d as u64 * self.h as u64
    }

    pub fn is_stored(&self) -> bool {
        self.status == Status::Stored
    }

    pub fn is_waste(&self) -> bool {
        self.status == Status::Waste
    }

    /// Marks this item stored at `container_id`/`position` (I4 consistency).
    pub fn mark_stored(&mut self, container_id: impl Into<Id>, position: Position) {
        self.status = Status::Stored;
        self.container_id = Some(container_id.into());
        self.position = Some(position);
    }

    /// Clears placement fields, returning to `pending` (used mid-rearrangement
    /// and on removal prior to a new placement).
    pub fn clear_placement(&mut self) {
        self.status = Status::Pending;
        self.container_id = None;
        self.position = None;
    }

    /// Marks this item waste for `reason`, leaving its container/position as-is
    /// until a return plan physically removes it (I4: waste does not imply
    /// un-stored).
    pub fn mark_waste(&mut self, reason: WasteReason) {
        self.status = Status::Waste;
        self.waste_reason = Some(reason);
    }

    pub fn mark_disposed(&mut self) {
        self.status = Status::Disposed;
        self.container_id = None;
        self.position = None;
    }

    /// True iff `clock` or usage has already pushed this item past waste
    /// thresholds (I4: `remainingUses = 0 OR expiryDate <= clock`).
    pub fn is_expired(&self, clock: DateTime<Utc>) -> bool {
        self.expiry_date.is_some_and(|e| e <= clock)
    }

    pub fn is_depleted(&self) -> bool {
        self.remaining_uses == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_pending_with_full_uses() {
        let item = Item::new("i1", "Food Packet", 10, 10, 20, 1.5, 80, None, 5, "Crew Quarters");
        assert_eq!(item.status, Status::Pending);
        assert_eq!(item.remaining_uses, 5);
        assert!(item.container_id.is_none());
    }

    #[test]
    fn mark_stored_then_clear_round_trips() {
        let mut item = Item::new("i1", "Food Packet", 10, 10, 20, 1.5, 80, None, 5, "Crew Quarters");
        let pos = Position::from_anchor(0, 0, 0, 10, 10, 20);
        item.mark_stored("c1", pos);
        assert!(item.is_stored());
        item.clear_placement();
        assert_eq!(item.status, Status::Pending);
        assert!(item.position.is_none());
    }

    #[test]
    fn depleted_and_expired_checks() {
        let mut item = Item::new("i1", "Widget", 1, 1, 1, 0.1, 50, None, 1, "General");
        assert!(!item.is_depleted());
        item.remaining_uses = 0;
        assert!(item.is_depleted());
    }
}

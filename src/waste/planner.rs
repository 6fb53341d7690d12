//! Waste identification, return-plan selection, and undocking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::manifest::ReturnManifest;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::geometry::Position;
use crate::item::{Item, Status, WasteReason};
use crate::retrieval::plan_retrieval;
use crate::Id;

/// One item currently marked waste.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteEntry {
    pub item_id: Id,
    pub name: String,
    pub reason: WasteReason,
    pub container_id: Option<Id>,
    pub position: Option<Position>,
}

/// The `{itemId, name, reason}` triple reported in a [`ReturnManifest`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnItem {
    pub item_id: Id,
    pub name: String,
    pub reason: WasteReason,
}

/// A planned relocation of a selected waste item to the undocking container.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnMove {
    pub item_id: Id,
    pub from_container_id: Option<Id>,
    pub to_container_id: Id,
    pub retrieval_steps: Vec<crate::retrieval::RetrievalStep>,
}

/// Scans the item registry for everything currently marked waste.
pub fn waste_list(items: &HashMap<Id, Item>) -> Vec<WasteEntry> {
    items
        .values()
        .filter(|i| i.status == Status::Waste)
        .map(|i| WasteEntry {
            item_id: i.item_id.clone(),
            name: i.name.clone(),
            reason: i.waste_reason.unwrap_or(WasteReason::OutOfUses),
            container_id: i.container_id.clone(),
            position: i.position,
        })
        .collect()
}

/// Builds a weight-bounded return manifest plus the per-item move list.
pub fn build_return_plan(
    undocking_container_id: &Id,
    undocking_date: chrono::DateTime<chrono::Utc>,
    max_weight: f64,
    items: &HashMap<Id, Item>,
    containers: &HashMap<Id, Container>,
) -> Result<(ReturnManifest, Vec<ReturnMove>)> {
    if !containers.contains_key(undocking_container_id) {
        return Err(Error::NotFound(format!(
            "undocking container {undocking_container_id} not found"
        )));
    }

    let waste = waste_list(items);
    let total_mass: f64 = waste.iter().map(|w| items[&w.item_id].mass).sum();

    let mut selected: Vec<&WasteEntry> = if total_mass <= max_weight {
        waste.iter().collect()
    } else {
        let mut sorted: Vec<&WasteEntry> = waste.iter().collect();
        sorted.sort_by(|a, b| {
            items[&b.item_id]
                .priority
                .cmp(&items[&a.item_id].priority)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });
        let mut acc = 0.0;
        let mut picked = Vec::new();
        for entry in sorted {
            let mass = items[&entry.item_id].mass;
            if acc + mass <= max_weight {
                acc += mass;
                picked.push(entry);
            }
        }
        picked
    };
    selected.sort_by(|a, b| a.item_id.cmp(&b.item_id));

    let mut return_items = Vec::with_capacity(selected.len());
    let mut moves = Vec::with_capacity(selected.len());
    let mut total_volume = 0u64;
    let mut total_weight = 0.0;

    for entry in &selected {
        let item = &items[&entry.item_id];
        return_items.push(ReturnItem {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            reason: entry.reason,
        });
        total_weight += item.mass;
        if let Some(pos) = item.position {
            total_volume += pos.volume();
        }

        let retrieval_steps = if item.container_id.is_some() {
            plan_retrieval(&entry.item_id, items, containers)?.steps
        } else {
            Vec::new()
        };

        moves.push(ReturnMove {
            item_id: item.item_id.clone(),
            from_container_id: item.container_id.clone(),
            to_container_id: undocking_container_id.clone(),
            retrieval_steps,
        });
    }

    let manifest = ReturnManifest {
        undocking_container_id: undocking_container_id.clone(),
        undocking_date,
        return_items,
        total_volume,
        total_weight,
    };

    Ok((manifest, moves))
}

/// Removes every item currently in `undocking_container_id`, marking each
/// `disposed`. Returns the ids removed (caller appends one log entry per id).
pub fn undock(
    undocking_container_id: &Id,
    items: &mut HashMap<Id, Item>,
    containers: &mut HashMap<Id, Container>,
) -> Result<Vec<Id>> {
    let container = containers
        .get_mut(undocking_container_id)
        .ok_or_else(|| Error::NotFound(format!("container {undocking_container_id} not found")))?;

    let ids: Vec<Id> = container.space().occupants().map(|(id, _)| id.clone()).collect();
    for id in &ids {
        container.space_mut().remove(id)?;
        if let Some(item) = items.get_mut(id) {
            item.mark_disposed();
        }
    }
    Ok(ids)
}

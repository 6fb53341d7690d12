//! Blocker discovery and step sequencing.

use std::collections::HashMap;

use super::error::RetrievalError;
use super::step::RetrievalStep;
use crate::container::Container;
use crate::geometry::Position;
use crate::item::Item;
use crate::Id;

/// A computed retrieval plan: the ordered steps and whether the target is
/// already marked waste (still physically present, but flagged).
#[derive(Debug, Clone, PartialEq)]
pub struct RetrievalPlan {
    pub steps: Vec<RetrievalStep>,
    pub from_waste: bool,
}

/// True iff `blocker` shares the corridor between `target` and the open face.
fn is_blocker(target: &Position, blocker: &Position) -> bool {
    blocker.ds < target.ds
        && blocker.ws < target.we
        && blocker.we > target.ws
        && blocker.hs < target.he
        && blocker.he > target.hs
}

/// Computes the one-level retrieval plan for `item_id`. Does not mutate
/// anything; executing the plan is the caller's responsibility.
pub fn plan_retrieval(
    item_id: &Id,
    items: &HashMap<Id, Item>,
    containers: &HashMap<Id, Container>,
) -> Result<RetrievalPlan, RetrievalError> {
    let target = items
        .get(item_id)
        .filter(|i| i.container_id.is_some() && i.position.is_some())
        .ok_or_else(|| RetrievalError::NotFound(item_id.clone()))?;

    let container_id = target.container_id.as_ref().unwrap();
    let target_pos = target.position.unwrap();
    let container = containers
        .get(container_id)
        .ok_or_else(|| RetrievalError::NotFound(item_id.clone()))?;

    let mut blockers: Vec<(Id, Position)> = if target_pos.ds == 0 {
        Vec::new()
    } else {
        container
            .space()
            .occupants()
            .filter(|(id, pos)| id.as_str() != item_id.as_str() && is_blocker(&target_pos, pos))
            .map(|(id, pos)| (id.clone(), *pos))
            .collect()
    };

    blockers.sort_by(|(ida, pa), (idb, pb)| {
        pa.ds
            .cmp(&pb.ds)
            .then_with(|| pa.ws.cmp(&pb.ws))
            .then_with(|| pa.hs.cmp(&pb.hs))
            .then_with(|| ida.cmp(idb))
    });

    let mut steps = Vec::with_capacity(blockers.len() * 2 + 1);
    for (id, _) in &blockers {
        steps.push(RetrievalStep::Remove {
            item_id: id.clone(),
            item_name: items[id].name.clone(),
        });
    }
    steps.push(RetrievalStep::Retrieve {
        item_id: item_id.clone(),
    });
    for (id, _) in blockers.iter().rev() {
        steps.push(RetrievalStep::PlaceBack {
            item_id: id.clone(),
        });
    }

    Ok(RetrievalPlan {
        steps,
        from_waste: target.is_waste(),
    })
}

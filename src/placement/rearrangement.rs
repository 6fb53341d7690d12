//! Rearrangement fallback (spec §4.2.1): temporarily evict lower-priority
//! donors to make room for an item that otherwise has no feasible candidate.

use std::collections::HashMap;

use super::planner::{best_candidate, commit_placement};
use crate::config::ScoringWeights;
use crate::container::Container;
use crate::geometry::Position;
use crate::item::Item;
use crate::Id;

/// A single donor relocation performed to make room for a higher-priority item.
#[derive(Debug, Clone, PartialEq)]
pub struct Move {
    pub item_id: Id,
    pub from_container_id: Id,
    pub from_position: Position,
    pub to_container_id: Id,
    pub to_position: Position,
}

/// Attempts to place `item_id` by evicting lower-priority donors one at a
/// time, in ascending priority then descending depth order. Returns the final
/// `(container_id, position, moves)` on success.
pub fn attempt(
    item_id: &Id,
    items: &mut HashMap<Id, Item>,
    containers: &mut HashMap<Id, Container>,
    weights: &ScoringWeights,
) -> Option<(Id, Position, Vec<Move>)> {
    let item_priority = items[item_id].priority;

    let mut donors: Vec<Id> = items
        .values()
        .filter(|i| i.is_stored() && i.priority < item_priority)
        .map(|i| i.item_id.clone())
        .collect();
    donors.sort_by(|a, b| {
        let pa = &items[a];
        let pb = &items[b];
        pa.priority
            .cmp(&pb.priority)
            .then_with(|| pb.position.unwrap().ds.cmp(&pa.position.unwrap().ds))
            .then_with(|| pa.item_id.cmp(&pb.item_id))
    });

    for donor_id in donors {
        let (donor_container, donor_position) = {
            let donor = &items[&donor_id];
            (donor.container_id.clone().unwrap(), donor.position.unwrap())
        };

        containers
            .get_mut(&donor_container)
            .unwrap()
            .space_mut()
            .remove(&donor_id)
            .expect("donor must be occupying its recorded position");
        items.get_mut(&donor_id).unwrap().clear_placement();

        let item_candidate = best_candidate(&items[item_id], containers, weights);

        if let Some(candidate) = item_candidate {
            commit_placement(item_id, &candidate, items, containers);

            if let Some(donor_candidate) = best_candidate(&items[&donor_id], containers, weights) {
                commit_placement(&donor_id, &donor_candidate, items, containers);
                return Some((
                    candidate.container_id,
                    candidate.position,
                    vec![Move {
                        item_id: donor_id,
                        from_container_id: donor_container,
                        from_position: donor_position,
                        to_container_id: donor_candidate.container_id,
                        to_position: donor_candidate.position,
                    }],
                ));
            }

            // Donor has nowhere to go: roll back both the item and the donor.
            containers
                .get_mut(&candidate.container_id)
                .unwrap()
                .space_mut()
                .remove(item_id)
                .expect("item placement just committed above");
            items.get_mut(item_id).unwrap().clear_placement();
        }

        // Restore the donor to its original position regardless of outcome.
        containers
            .get_mut(&donor_container)
            .unwrap()
            .space_mut()
            .place(donor_id.clone(), donor_position)
            .expect("donor's original position is free again after rollback");
        items
            .get_mut(&donor_id)
            .unwrap()
            .mark_stored(donor_container.clone(), donor_position);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::placement::planner::place_batch;

    fn registry(items: Vec<Item>) -> HashMap<Id, Item> {
        items.into_iter().map(|i| (i.item_id.clone(), i)).collect()
    }

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    #[test]
    fn full_container_evicts_low_priority_item_with_no_home() {
        let mut containers = HashMap::new();
        containers.insert("C".to_string(), Container::new("C", "General", 20, 20, 20));
        let mut items = registry(vec![Item::new(
            "L", "L", 20, 20, 20, 1.0, 10, None, 1, "General",
        )]);
        place_batch(&["L".to_string()], &mut items, &mut containers, &weights());
        assert!(items["L"].is_stored());

        items.insert(
            "H".to_string(),
            Item::new("H", "H", 20, 20, 20, 1.0, 90, None, 1, "General"),
        );
        let results = place_batch(&["H".to_string()], &mut items, &mut containers, &weights());

        match &results[0].1 {
            crate::placement::PlacementOutcome::Rearranged {
                container_id,
                position,
                moves,
            } => {
                assert_eq!(container_id, "C");
                assert_eq!(*position, Position::from_anchor(0, 0, 0, 20, 20, 20));
                assert_eq!(moves.len(), 1);
                assert_eq!(moves[0].item_id, "L");
            }
            other => panic!("expected Rearranged, got {other:?}"),
        }
        assert!(!items["L"].is_stored());
        assert!(items["H"].is_stored());
    }
}

//! Candidate generation, scoring, and the top-level batch placement loop
//! (spec §4.2 steps 1-5).

use std::collections::HashMap;

use super::rearrangement::{self, Move};
use super::scoring::score;
use crate::config::ScoringWeights;
use crate::container::Container;
use crate::geometry::{orientations, Position};
use crate::item::Item;
use crate::Id;

/// Result of attempting to place a single item.
#[derive(Debug, Clone, PartialEq)]
pub enum PlacementOutcome {
    Placed {
        container_id: Id,
        position: Position,
    },
    Rearranged {
        container_id: Id,
        position: Position,
        moves: Vec<Move>,
    },
    Unplaced,
}

#[derive(Debug, Clone)]
pub(super) struct Candidate {
    pub container_id: Id,
    pub position: Position,
    pub score: f64,
}

impl Candidate {
    fn tie_key(&self) -> (Id, u32, u32, u32) {
        (
            self.container_id.clone(),
            self.position.ds,
            self.position.hs,
            self.position.ws,
        )
    }
}

/// Enumerates every feasible `(container, orientation, anchor)` candidate for
/// `item` and returns the highest-scoring one, ties broken lexicographically
/// by `(containerId, ds, hs, ws)` (spec §4.2 steps 2-4).
pub(super) fn best_candidate(
    item: &Item,
    containers: &HashMap<Id, Container>,
    weights: &ScoringWeights,
) -> Option<Candidate> {
    let mut candidates = Vec::new();

    for container in containers.values() {
        for (w, d, h) in orientations(item.w, item.d, item.h) {
            for (ws, ds, hs) in container.space().skyline() {
                let pos = Position::from_anchor(ws, ds, hs, w, d, h);
                if container.space().can_fit(&pos) {
                    candidates.push(Candidate {
                        container_id: container.container_id.clone(),
                        position: pos,
                        score: score(item, container, &pos, weights),
                    });
                }
            }
        }
    }

    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then_with(|| a.tie_key().cmp(&b.tie_key()))
    });
    candidates.into_iter().next()
}

/// Places `item_ids` in priority order (spec §4.2 step 1), mutating `items`
/// and `containers` in place. Each item either places directly, places via a
/// rearrangement, or ends up `Unplaced`.
pub fn place_batch(
    item_ids: &[Id],
    items: &mut HashMap<Id, Item>,
    containers: &mut HashMap<Id, Container>,
    weights: &ScoringWeights,
) -> Vec<(Id, PlacementOutcome)> {
    let mut ordered = item_ids.to_vec();
    ordered.sort_by(|a, b| {
        let ia = &items[a];
        let ib = &items[b];
        ib.priority
            .cmp(&ia.priority)
            .then_with(|| ib.volume().cmp(&ia.volume()))
            .then_with(|| ia.item_id.cmp(&ib.item_id))
    });

    let mut results = Vec::with_capacity(ordered.len());
    for id in ordered {
        let outcome = place_one(&id, items, containers, weights);
        results.push((id, outcome));
    }
    results
}

fn place_one(
    id: &Id,
    items: &mut HashMap<Id, Item>,
    containers: &mut HashMap<Id, Container>,
    weights: &ScoringWeights,
) -> PlacementOutcome {
    let candidate = {
        let item = &items[id];
        best_candidate(item, containers, weights)
    };

    if let Some(candidate) = candidate {
        commit_placement(id, &candidate, items, containers);
        return PlacementOutcome::Placed {
            container_id: candidate.container_id,
            position: candidate.position,
        };
    }

    match rearrangement::attempt(id, items, containers, weights) {
        Some((container_id, position, moves)) => PlacementOutcome::Rearranged {
            container_id,
            position,
            moves,
        },
        None => PlacementOutcome::Unplaced,
    }
}

pub(super) fn commit_placement(
    id: &Id,
    candidate: &Candidate,
    items: &mut HashMap<Id, Item>,
    containers: &mut HashMap<Id, Container>,
) {
    let container = containers
        .get_mut(&candidate.container_id)
        .expect("candidate container must exist");
    container
        .space_mut()
        .place(id.clone(), candidate.position)
        .expect("can_fit was already checked when the candidate was scored");
    items
        .get_mut(id)
        .expect("item must exist in registry")
        .mark_stored(candidate.container_id.clone(), candidate.position);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::Status;

    fn registry(items: Vec<Item>) -> HashMap<Id, Item> {
        items.into_iter().map(|i| (i.item_id.clone(), i)).collect()
    }

    fn weights() -> ScoringWeights {
        ScoringWeights::default()
    }

    #[test]
    fn place_then_retrieve_no_blockers() {
        let mut containers = HashMap::new();
        containers.insert("A".to_string(), Container::new("A", "Zone1", 100, 85, 200));
        let mut items = registry(vec![Item::new(
            "X", "X", 10, 10, 20, 1.0, 80, None, 1, "Zone1",
        )]);

        let results = place_batch(&["X".to_string()], &mut items, &mut containers, &weights());
        assert_eq!(results.len(), 1);
        match &results[0].1 {
            PlacementOutcome::Placed {
                container_id,
                position,
            } => {
                assert_eq!(container_id, "A");
                assert_eq!(*position, Position::from_anchor(0, 0, 0, 10, 10, 20));
            }
            other => panic!("expected Placed, got {other:?}"),
        }
        assert_eq!(items["X"].status, Status::Stored);
    }

    #[test]
    fn priority_ordering_places_higher_priority_first_at_origin() {
        let mut containers = HashMap::new();
        containers.insert("A".to_string(), Container::new("A", "Zone1", 100, 100, 100));
        let mut items = registry(vec![
            Item::new("lo", "lo", 50, 50, 50, 1.0, 50, None, 1, "Zone1"),
            Item::new("hi", "hi", 50, 50, 50, 1.0, 90, None, 1, "Zone1"),
        ]);

        let results = place_batch(
            &["lo".to_string(), "hi".to_string()],
            &mut items,
            &mut containers,
            &weights(),
        );
        let by_id: HashMap<_, _> = results.into_iter().collect();

        assert_eq!(
            by_id["hi"],
            PlacementOutcome::Placed {
                container_id: "A".to_string(),
                position: Position::from_anchor(0, 0, 0, 50, 50, 50),
            }
        );
        assert_eq!(
            by_id["lo"],
            PlacementOutcome::Placed {
                container_id: "A".to_string(),
                position: Position::from_anchor(50, 0, 0, 50, 50, 50),
            }
        );
    }

    #[test]
    fn item_exceeding_every_dimension_is_unplaced() {
        let mut containers = HashMap::new();
        containers.insert("A".to_string(), Container::new("A", "Zone1", 10, 10, 10));
        let mut items = registry(vec![Item::new(
            "big", "big", 20, 20, 20, 1.0, 50, None, 1, "Zone1",
        )]);

        let results = place_batch(&["big".to_string()], &mut items, &mut containers, &weights());
        assert_eq!(results[0].1, PlacementOutcome::Unplaced);
    }
}

//! Single owner object (spec §4.6): one writer lock guarding containers,
//! items, the action log, and the logical clock. Every mutating method is
//! mutate-a-scratch-copy -> persist via [`Store`] -> commit, so a `Store`
//! failure leaves the committed state untouched (spec §5, §7, §9).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::json;

use crate::config::EngineConfig;
use crate::container::{Container, ContainerSpace};
use crate::error::{Error, Result};
use crate::item::{Item, Status};
use crate::log::{ActionLog, ActionType, LogEntry};
use crate::placement::{self, PlacementOutcome};
use crate::retrieval::{self, RetrievalPlan, RetrievalStep};
use crate::simulator::{self, SimulationInput, SimulationResult};
use crate::store::Store;
use crate::waste::{self, ReturnPlan};
use crate::Id;

use super::search::SearchHit;

struct State {
    containers: HashMap<Id, Container>,
    items: HashMap<Id, Item>,
    log: ActionLog,
    clock: DateTime<Utc>,
}

/// Owns every piece of mutable core state behind a single lock, generic over
/// the persistence adapter. All public methods take `&self`; two calls on the
/// same `Engine` never interleave (spec §5).
pub struct Engine<S: Store> {
    store: S,
    config: EngineConfig,
    state: Mutex<State>,
}

impl<S: Store> Engine<S> {
    /// Loads containers and items from `store` and starts the logical clock
    /// at `initial_clock`, using the default [`EngineConfig`] (the spec's own
    /// scoring weights and CSV defaults).
    pub fn new(store: S, initial_clock: DateTime<Utc>) -> Result<Self> {
        Self::with_config(store, initial_clock, EngineConfig::default())
    }

    /// Like [`Engine::new`], but with an explicit [`EngineConfig`] — for
    /// deployments that retune the scoring weights or CSV defaults.
    pub fn with_config(store: S, initial_clock: DateTime<Utc>, config: EngineConfig) -> Result<Self> {
        let mut containers: HashMap<Id, Container> = store
            .get_containers()?
            .into_iter()
            .map(|c| (c.container_id.clone(), c))
            .collect();
        let items: HashMap<Id, Item> = store
            .get_items()?
            .into_iter()
            .map(|i| (i.item_id.clone(), i))
            .collect();

        // `ContainerSpace` is `#[serde(skip)]`: a `Store` backend that actually
        // round-trips containers through serde hands back an empty, zero-sized
        // space. Rebuild it from scratch and replay every stored item's own
        // `containerId`/`position` — the source of truth per I4 — rather than
        // trusting whatever occupancy the adapter returned.
        for container in containers.values_mut() {
            let (w, d, h) = (container.width, container.depth, container.height);
            *container.space_mut() = ContainerSpace::new(w, d, h);
        }
        for item in items.values() {
            if item.status != Status::Stored {
                continue;
            }
            let (Some(container_id), Some(position)) = (&item.container_id, item.position) else {
                continue;
            };
            let container = containers
                .get_mut(container_id)
                .ok_or_else(|| Error::NotFound(format!("container {container_id} not found")))?;
            container.space_mut().place(item.item_id.clone(), position)?;
        }

        Ok(Self {
            store,
            config,
            state: Mutex::new(State {
                containers,
                items,
                log: ActionLog::new(),
                clock: initial_clock,
            }),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Registers a new item (spec §4.1). Rejects a duplicate `itemId` (I3).
    pub fn add_item(&self, item: Item) -> Result<()> {
        let mut state = self.state.lock();
        if state.items.contains_key(&item.item_id) {
            return Err(Error::Duplicate(item.item_id));
        }

        self.store.upsert_item(item.clone())?;
        let entry = LogEntry::new(state.clock, ActionType::Add, item.item_id.clone());
        self.store.append_log(entry.clone())?;

        tracing::info!(item_id = %item.item_id, "item added");
        state.log.append(entry);
        state.items.insert(item.item_id.clone(), item);
        Ok(())
    }

    /// Places `item_ids` in priority order, evicting lower-priority donors
    /// when a direct fit doesn't exist (spec §4.2). Runs against a scratch
    /// copy of the state so a `Store` rejection mid-batch commits nothing.
    pub fn place_batch(&self, item_ids: &[Id]) -> Result<Vec<(Id, PlacementOutcome)>> {
        let mut state = self.state.lock();
        let mut items = state.items.clone();
        let mut containers = state.containers.clone();

        let outcomes = placement::place_batch(item_ids, &mut items, &mut containers, &self.config.scoring);

        // A rearrangement also relocates a donor item, not just the target.
        let mut touched: Vec<Id> = Vec::new();
        for (id, outcome) in &outcomes {
            match outcome {
                PlacementOutcome::Placed { .. } => touched.push(id.clone()),
                PlacementOutcome::Rearranged { moves, .. } => {
                    touched.push(id.clone());
                    touched.extend(moves.iter().map(|m| m.item_id.clone()));
                }
                PlacementOutcome::Unplaced => {}
            }
        }
        touched.sort();
        touched.dedup();

        for id in &touched {
            self.store.upsert_item(items[id].clone())?;
        }

        let mut entries = Vec::with_capacity(outcomes.len());
        for (id, outcome) in &outcomes {
            let (action_type, details) = match outcome {
                PlacementOutcome::Placed {
                    container_id,
                    position,
                } => (
                    ActionType::Placement,
                    json!({"containerId": container_id, "position": position, "placed": true}),
                ),
                PlacementOutcome::Rearranged {
                    container_id,
                    position,
                    moves,
                } => (
                    ActionType::Rearrange,
                    json!({
                        "containerId": container_id,
                        "position": position,
                        "movedDonors": moves.iter().map(|m| m.item_id.clone()).collect::<Vec<_>>(),
                    }),
                ),
                PlacementOutcome::Unplaced => (ActionType::Placement, json!({"placed": false})),
            };
            let entry = LogEntry::new(state.clock, action_type, id.clone()).with_details(details);
            self.store.append_log(entry.clone())?;
            entries.push(entry);
        }

        for entry in entries {
            state.log.append(entry);
        }
        let placed = outcomes
            .iter()
            .filter(|(_, o)| !matches!(o, PlacementOutcome::Unplaced))
            .count();
        tracing::info!(requested = outcomes.len(), placed, "placement batch committed");
        state.items = items;
        state.containers = containers;
        Ok(outcomes)
    }

    /// Computes and executes a retrieval plan for `item_id` (spec §4.3):
    /// removes blockers, retrieves the target, then places blockers back in
    /// their original positions. A retrieved item returns to `pending` with
    /// no container or position — the crew now holds it — unless retrieval
    /// decrements its `remainingUses` to 0, in which case it becomes `waste`
    /// (spec §3 lifecycle; mirrors `retrieve_item`'s unconditional decrement
    /// in the original source).
    pub fn retrieve(&self, item_id: &Id) -> Result<RetrievalPlan> {
        let mut state = self.state.lock();
        let mut items = state.items.clone();
        let mut containers = state.containers.clone();

        let plan = retrieval::plan_retrieval(item_id, &items, &containers)?;
        let mut depleted = false;

        for step in &plan.steps {
            match step {
                RetrievalStep::Remove { item_id: id, .. } => {
                    let container_id = items[id]
                        .container_id
                        .clone()
                        .expect("blocker must be stored to block anything");
                    containers
                        .get_mut(&container_id)
                        .expect("blocker's container must exist")
                        .space_mut()
                        .remove(id)?;
                }
                RetrievalStep::Retrieve { item_id: id } => {
                    let container_id = items[id]
                        .container_id
                        .clone()
                        .expect("retrieval target must be stored");
                    containers
                        .get_mut(&container_id)
                        .expect("target's container must exist")
                        .space_mut()
                        .remove(id)?;
                    let item = items.get_mut(id).unwrap();
                    item.clear_placement();
                    if item.remaining_uses > 0 {
                        item.remaining_uses -= 1;
                        if item.remaining_uses == 0 {
                            item.mark_waste(crate::item::WasteReason::OutOfUses);
                            depleted = true;
                        }
                    }
                }
                RetrievalStep::PlaceBack { item_id: id } => {
                    let item = &items[id];
                    let container_id = item
                        .container_id
                        .clone()
                        .expect("blocker keeps its container id while displaced");
                    let position = item
                        .position
                        .expect("blocker keeps its position while displaced");
                    containers
                        .get_mut(&container_id)
                        .expect("blocker's container must exist")
                        .space_mut()
                        .place(id.clone(), position)?;
                }
            }
        }

        self.store.upsert_item(items[item_id].clone())?;
        let entry = LogEntry::new(state.clock, ActionType::Retrieval, item_id.clone()).with_details(json!({
            "steps": plan.steps.len(),
            "fromWaste": plan.from_waste,
            "remainingUses": items[item_id].remaining_uses,
        }));
        self.store.append_log(entry.clone())?;
        let mut entries = vec![entry];

        if depleted {
            let waste_entry = LogEntry::new(state.clock, ActionType::Waste, item_id.clone())
                .with_details(json!({"reason": "OutOfUses"}));
            self.store.append_log(waste_entry.clone())?;
            entries.push(waste_entry);
        }

        tracing::info!(
            item_id = %item_id,
            steps = plan.steps.len(),
            depleted,
            "item retrieved"
        );
        for entry in entries {
            state.log.append(entry);
        }
        state.items = items;
        state.containers = containers;
        Ok(plan)
    }

    /// Finds every item named `name`, sorted by `itemId`. Logs unconditionally,
    /// even when nothing matches (spec §7's one logging exception).
    pub fn search(&self, name: &str) -> Result<Vec<SearchHit>> {
        let mut state = self.state.lock();
        let mut hits: Vec<SearchHit> = state
            .items
            .values()
            .filter(|i| i.name == name)
            .map(|i| SearchHit {
                item_id: i.item_id.clone(),
                name: i.name.clone(),
                status: i.status,
                container_id: i.container_id.clone(),
                position: i.position,
            })
            .collect();
        hits.sort_by(|a, b| a.item_id.cmp(&b.item_id));

        let entry = LogEntry::new(state.clock, ActionType::Search, String::new())
            .with_details(json!({"query": name, "matches": hits.len()}));
        self.store.append_log(entry.clone())?;

        tracing::info!(query = name, matches = hits.len(), "search executed");
        state.log.append(entry);
        Ok(hits)
    }

    /// Advances the logical clock, running the day-stepped expiry/usage sweep
    /// (spec §4.5). Appends one `waste` log entry per item that transitions
    /// to waste during the run.
    pub fn simulate(&self, input: SimulationInput) -> Result<SimulationResult> {
        let mut state = self.state.lock();
        let mut items = state.items.clone();
        let mut clock = state.clock;

        let result = simulator::simulate(input, &mut clock, &mut items)?;

        let mut touched: Vec<Id> = result.changes.items_expired.clone();
        touched.extend(result.changes.items_used.iter().map(|u| u.item_id.clone()));
        touched.sort();
        touched.dedup();
        for id in &touched {
            self.store.upsert_item(items[id].clone())?;
        }

        let mut entries = Vec::new();
        for id in &result.changes.items_expired {
            entries.push(
                LogEntry::new(clock, ActionType::Waste, id.clone())
                    .with_details(json!({"reason": "Expired"})),
            );
        }
        for id in &result.changes.items_depleted_today {
            entries.push(
                LogEntry::new(clock, ActionType::Waste, id.clone())
                    .with_details(json!({"reason": "OutOfUses"})),
            );
        }
        for entry in &entries {
            self.store.append_log(entry.clone())?;
        }

        tracing::info!(
            new_date = %result.new_date,
            expired = result.changes.items_expired.len(),
            depleted = result.changes.items_depleted_today.len(),
            "simulation advanced"
        );
        for entry in entries {
            state.log.append(entry);
        }
        state.items = items;
        state.clock = clock;
        Ok(result)
    }

    /// Lists every item currently marked waste (spec §4.4 step 1).
    pub fn waste_list(&self) -> Vec<crate::waste::WasteEntry> {
        let state = self.state.lock();
        waste::waste_list(&state.items)
    }

    /// Builds a weight-bounded return manifest and its move list. Read-only:
    /// executing the moves is a separate `retrieve` call per item, left to
    /// the caller (spec §4.4 steps 2-5).
    pub fn build_return_plan(
        &self,
        undocking_container_id: &Id,
        undocking_date: DateTime<Utc>,
        max_weight: f64,
    ) -> Result<ReturnPlan> {
        let state = self.state.lock();
        let (manifest, moves) = waste::build_return_plan(
            undocking_container_id,
            undocking_date,
            max_weight,
            &state.items,
            &state.containers,
        )?;
        Ok(ReturnPlan { manifest, moves })
    }

    /// Removes and disposes every item physically in `undocking_container_id`
    /// (spec §4.4 step 6). Appends one `disposal` log entry per item.
    pub fn undock(&self, undocking_container_id: &Id) -> Result<Vec<Id>> {
        let mut state = self.state.lock();
        let mut items = state.items.clone();
        let mut containers = state.containers.clone();

        let removed = waste::undock(undocking_container_id, &mut items, &mut containers)?;

        for id in &removed {
            self.store.upsert_item(items[id].clone())?;
        }
        let mut entries = Vec::with_capacity(removed.len());
        for id in &removed {
            let entry = LogEntry::new(state.clock, ActionType::Disposal, id.clone());
            self.store.append_log(entry.clone())?;
            entries.push(entry);
        }

        tracing::info!(
            container_id = %undocking_container_id,
            count = removed.len(),
            "undocked"
        );
        for entry in entries {
            state.log.append(entry);
        }
        state.items = items;
        state.containers = containers;
        Ok(removed)
    }

    /// Reads the action log, optionally filtered by `action_type` (spec §6).
    pub fn logs(&self, action_type: Option<ActionType>) -> Vec<LogEntry> {
        self.state.lock().log.read(action_type).into_iter().cloned().collect()
    }

    pub fn get_item(&self, item_id: &Id) -> Option<Item> {
        self.state.lock().items.get(item_id).cloned()
    }

    pub fn list_items(&self) -> Vec<Item> {
        self.state.lock().items.values().cloned().collect()
    }

    pub fn list_containers(&self) -> Vec<Container> {
        self.state.lock().containers.values().cloned().collect()
    }

    pub fn clock(&self) -> DateTime<Utc> {
        self.state.lock().clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Position;
    use crate::store::memory::MemoryStore;
    use chrono::TimeZone;

    fn clock_at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn engine_with_container() -> Engine<MemoryStore> {
        let store = MemoryStore::new();
        store.seed_container(Container::new("A", "Zone1", 100, 100, 100));
        Engine::new(store, clock_at(2030, 1, 1)).unwrap()
    }

    #[test]
    fn add_item_rejects_duplicate_id() {
        let engine = engine_with_container();
        let item = Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 1, "Zone1");
        engine.add_item(item.clone()).unwrap();
        let err = engine.add_item(item).unwrap_err();
        assert!(matches!(err, Error::Duplicate(_)));
    }

    #[test]
    fn place_then_retrieve_round_trips_through_the_log() {
        let engine = engine_with_container();
        // usage_limit=2 so this retrieval doesn't deplete the item — that
        // path is covered separately below.
        engine
            .add_item(Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 2, "Zone1"))
            .unwrap();

        let outcomes = engine.place_batch(&["X".to_string()]).unwrap();
        assert!(matches!(outcomes[0].1, PlacementOutcome::Placed { .. }));
        assert_eq!(engine.get_item(&"X".to_string()).unwrap().status, Status::Stored);

        let plan = engine.retrieve(&"X".to_string()).unwrap();
        assert_eq!(plan.steps.len(), 1);
        let retrieved = engine.get_item(&"X".to_string()).unwrap();
        assert_eq!(retrieved.status, Status::Pending);
        assert_eq!(retrieved.remaining_uses, 1);

        let actions: Vec<_> = engine.logs(None).iter().map(|e| e.action_type).collect();
        assert_eq!(
            actions,
            vec![ActionType::Add, ActionType::Placement, ActionType::Retrieval]
        );
    }

    #[test]
    fn retrieve_decrements_remaining_uses_and_depletion_marks_waste() {
        let engine = engine_with_container();
        engine
            .add_item(Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 1, "Zone1"))
            .unwrap();
        engine.place_batch(&["X".to_string()]).unwrap();

        engine.retrieve(&"X".to_string()).unwrap();

        let item = engine.get_item(&"X".to_string()).unwrap();
        assert_eq!(item.remaining_uses, 0);
        assert_eq!(item.status, Status::Waste);
        assert_eq!(item.waste_reason, Some(crate::item::WasteReason::OutOfUses));

        let actions: Vec<_> = engine.logs(None).iter().map(|e| e.action_type).collect();
        assert_eq!(
            actions,
            vec![
                ActionType::Add,
                ActionType::Placement,
                ActionType::Retrieval,
                ActionType::Waste,
            ]
        );
    }

    #[test]
    fn search_logs_even_on_zero_matches() {
        let engine = engine_with_container();
        let hits = engine.search("nothing").unwrap();
        assert!(hits.is_empty());
        assert_eq!(engine.logs(Some(ActionType::Search)).len(), 1);
    }

    #[test]
    fn custom_scoring_weights_change_which_candidate_wins() {
        // With the zone bonus zeroed out, an exact-zone-match container no
        // longer outranks a closer-to-the-face mismatched-zone container.
        let store = MemoryStore::new();
        store.seed_container(Container::new("near", "Other", 100, 100, 100));
        store.seed_container(Container::new("far", "Zone1", 100, 100, 100));
        let config = crate::config::EngineConfig {
            scoring: crate::config::ScoringWeights {
                priority_weight: 10.0,
                zone_weight: 0.0,
                volume_weight: 2.0,
            },
            ..Default::default()
        };
        let engine = Engine::with_config(store, clock_at(2030, 1, 1), config).unwrap();
        engine
            .add_item(Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 1, "Zone1"))
            .unwrap();
        let outcomes = engine.place_batch(&["X".to_string()]).unwrap();
        match &outcomes[0].1 {
            PlacementOutcome::Placed { container_id, .. } => {
                // Both containers tie on depth/volume once zone is zeroed;
                // the lexicographic tiebreak picks "far" over "near".
                assert_eq!(container_id, "far");
            }
            other => panic!("expected Placed, got {other:?}"),
        }
    }

    #[test]
    fn undock_disposes_and_logs_per_item() {
        let engine = engine_with_container();
        engine
            .add_item(Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 1, "Zone1"))
            .unwrap();
        engine.place_batch(&["X".to_string()]).unwrap();

        let removed = engine.undock(&"A".to_string()).unwrap();
        assert_eq!(removed, vec!["X".to_string()]);
        assert_eq!(engine.get_item(&"X".to_string()).unwrap().status, Status::Disposed);
        assert_eq!(engine.logs(Some(ActionType::Disposal)).len(), 1);
    }

    #[test]
    fn loading_rebuilds_container_occupancy_from_stored_items() {
        // Simulates a `Store` handing back a container with its occupancy
        // already present (as `MemoryStore` does) alongside an item whose own
        // `containerId`/`position` claims the same slot. `Engine::with_config`
        // must not trust the container's own space wholesale — it rebuilds it
        // from scratch and replays placement from each item's fields, so a
        // backend that instead round-trips `Container` through serde (and
        // loses the skipped `space` field) still ends up with correct
        // occupancy.
        let store = MemoryStore::new();
        store.seed_container(Container::new("A", "Zone1", 100, 100, 100));
        let mut stored = Item::new("X", "X", 10, 10, 10, 1.0, 50, None, 1, "Zone1");
        stored.mark_stored("A", Position::from_anchor(0, 0, 0, 10, 10, 10));
        store.upsert_item(stored).unwrap();

        let engine = Engine::new(store, clock_at(2030, 1, 1)).unwrap();

        let containers = engine.list_containers();
        let container = containers.iter().find(|c| c.container_id == "A").unwrap();
        assert_eq!(container.space().occupant_count(), 1);
        assert!(!container
            .space()
            .can_fit(&Position::from_anchor(5, 5, 5, 10, 10, 10)));
        assert!(container
            .space()
            .can_fit(&Position::from_anchor(10, 0, 0, 10, 10, 10)));

        // A second item placed through the normal batch path lands beside the
        // rebuilt occupant instead of overlapping it.
        engine
            .add_item(Item::new("Y", "Y", 10, 10, 10, 1.0, 50, None, 1, "Zone1"))
            .unwrap();
        let outcomes = engine.place_batch(&["Y".to_string()]).unwrap();
        match &outcomes[0].1 {
            PlacementOutcome::Placed { position, .. } => {
                assert_eq!(*position, Position::from_anchor(10, 0, 0, 10, 10, 10));
            }
            other => panic!("expected Placed, got {other:?}"),
        }
    }
}

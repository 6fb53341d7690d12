//! Example demonstrating the Placement Planner: priority ordering and
//! rearrangement fallback when a container is full.
//!
//! Run with: `cargo run --example placement_demo`

use chrono::{TimeZone, Utc};
use stowage_engine::container::Container;
use stowage_engine::engine::Engine;
use stowage_engine::item::Item;
use stowage_engine::placement::PlacementOutcome;
use stowage_engine::store::memory::MemoryStore;

fn main() {
    println!("=== Placement Planner Example ===\n");

    let store = MemoryStore::new();
    store.seed_container(Container::new("contA", "Crew Quarters", 100, 85, 200));
    let clock = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let engine = Engine::new(store, clock).expect("containers/items load from an empty store");

    println!("--- Adding Items ---");
    for item in [
        Item::new("001", "Food Packet", 10, 10, 20, 1.5, 80, None, 5, "Crew Quarters"),
        Item::new("002", "Oxygen Cylinder", 15, 15, 50, 10.0, 95, None, 1, "Airlock"),
        Item::new("003", "First Aid Kit", 20, 20, 10, 2.0, 60, None, 1, "Medical Bay"),
    ] {
        println!("Adding {} ({})", item.item_id, item.name);
        engine.add_item(item).unwrap();
    }

    println!("\n--- Placing Items (priority order) ---");
    let outcomes = engine
        .place_batch(&["001".to_string(), "002".to_string(), "003".to_string()])
        .unwrap();
    for (item_id, outcome) in &outcomes {
        match outcome {
            PlacementOutcome::Placed {
                container_id,
                position,
            } => println!("  {item_id} -> placed in {container_id} at {position:?}"),
            PlacementOutcome::Rearranged {
                container_id,
                position,
                moves,
            } => println!(
                "  {item_id} -> placed in {container_id} at {position:?} after evicting {} item(s)",
                moves.len()
            ),
            PlacementOutcome::Unplaced => println!("  {item_id} -> no container could fit it"),
        }
    }

    println!("\n--- Filling the Remaining Space ---");
    let filler_ids: Vec<String> = (0..5)
        .map(|i| {
            let id = format!("filler-{i}");
            engine
                .add_item(Item::new(&id, "Filler", 40, 40, 60, 3.0, 10, None, 1, "Crew Quarters"))
                .unwrap();
            id
        })
        .collect();
    let filler_outcomes = engine.place_batch(&filler_ids).unwrap();
    let placed = filler_outcomes
        .iter()
        .filter(|(_, o)| !matches!(o, PlacementOutcome::Unplaced))
        .count();
    println!("  {placed}/{} low-priority filler items found a home", filler_ids.len());

    println!("\n--- High-Priority Item Requiring Rearrangement ---");
    engine
        .add_item(Item::new(
            "critical",
            "Emergency Beacon",
            40,
            40,
            60,
            4.0,
            99,
            None,
            1,
            "Crew Quarters",
        ))
        .unwrap();
    match &engine.place_batch(&["critical".to_string()]).unwrap()[0].1 {
        PlacementOutcome::Rearranged { moves, .. } => {
            println!("  critical placed; evicted: {:?}", moves.iter().map(|m| &m.item_id).collect::<Vec<_>>());
        }
        other => println!("  critical -> {other:?}"),
    }

    println!("\n=== Example Complete ===");
}

//! Example demonstrating the Retrieval Planner: blockers in front of a
//! target item get removed and placed back around it.
//!
//! Run with: `cargo run --example retrieval_demo`

use chrono::{TimeZone, Utc};
use stowage_engine::container::Container;
use stowage_engine::engine::Engine;
use stowage_engine::item::Item;
use stowage_engine::retrieval::RetrievalStep;
use stowage_engine::store::memory::MemoryStore;

fn main() {
    println!("=== Retrieval Planner Example ===\n");

    let store = MemoryStore::new();
    store.seed_container(Container::new("contA", "Crew Quarters", 100, 85, 200));
    let clock = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let engine = Engine::new(store, clock).expect("containers/items load from an empty store");

    println!("--- Stocking the Container Back-to-Front ---");
    for (id, name, priority) in [
        ("back", "Spare Parts", 40),
        ("middle", "Water Filter", 55),
        ("target", "Medical Kit", 90),
    ] {
        engine
            .add_item(Item::new(id, name, 20, 20, 20, 2.0, priority, None, 1, "Crew Quarters"))
            .unwrap();
    }
    // Highest priority first means `target` claims the open face; `middle`
    // and `back` stack in behind it.
    engine
        .place_batch(&["target".to_string(), "middle".to_string(), "back".to_string()])
        .unwrap();

    for item in engine.list_items() {
        if let Some(pos) = item.position {
            println!("  {} ({}) at {pos:?}", item.item_id, item.name);
        }
    }

    println!("\n--- Retrieving the Item Behind the Others ---");
    let plan = engine.retrieve(&"back".to_string()).unwrap();
    for step in &plan.steps {
        match step {
            RetrievalStep::Remove { item_id, item_name } => {
                println!("  remove {item_name} ({item_id}) to clear the path")
            }
            RetrievalStep::Retrieve { item_id } => println!("  retrieve {item_id}"),
            RetrievalStep::PlaceBack { item_id } => println!("  place {item_id} back"),
        }
    }

    println!(
        "\nRetrieved item status: {:?}",
        engine.get_item(&"back".to_string()).unwrap().status
    );

    println!("\n=== Example Complete ===");
}

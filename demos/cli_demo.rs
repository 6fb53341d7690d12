//! A thin CLI façade over [`Engine<MemoryStore>`], illustrating the nominal
//! command surface (spec §6). This wiring is not part of the core: it
//! translates `Error` into an exit code and formats results as text.
//!
//! Run with: `cargo run --example cli_demo -- add X Widget 10 10 10`
//! or without arguments to walk through every subcommand once.

use chrono::Utc;
use stowage_engine::container::Container;
use stowage_engine::engine::Engine;
use stowage_engine::error::Error;
use stowage_engine::item::Item;
use stowage_engine::log::ActionType;
use stowage_engine::store::memory::MemoryStore;

fn exit_code(err: &Error) -> i32 {
    match err {
        Error::NotFound(_) => 1,
        Error::Validation(_) | Error::InvalidArgs(_) => 2,
        Error::Conflict(_) | Error::Duplicate(_) => 3,
        Error::Unavailable(_) => 4,
    }
}

fn run_add(engine: &Engine<MemoryStore>, args: &[String]) -> Result<(), Error> {
    let [id, name, w, d, h] = args else {
        return Err(Error::Validation("usage: add <id> <name> <w> <d> <h>".into()));
    };
    let parse_dim = |s: &str| s.parse::<u32>().map_err(|_| Error::Validation(format!("not a number: {s}")));
    let item = Item::new(
        id.clone(),
        name.clone(),
        parse_dim(w)?,
        parse_dim(d)?,
        parse_dim(h)?,
        1.0,
        50,
        None,
        1,
        "General",
    );
    engine.add_item(item)?;
    println!("added {id}");
    Ok(())
}

fn run_search(engine: &Engine<MemoryStore>, args: &[String]) -> Result<(), Error> {
    let [name] = args else {
        return Err(Error::Validation("usage: search --name <name>".into()));
    };
    for hit in engine.search(name)? {
        println!("{} ({:?}) in {:?}", hit.item_id, hit.status, hit.container_id);
    }
    Ok(())
}

fn run_retrieve(engine: &Engine<MemoryStore>, args: &[String]) -> Result<(), Error> {
    let [id] = args else {
        return Err(Error::Validation("usage: retrieve --id <id>".into()));
    };
    let plan = engine.retrieve(id)?;
    println!("{} step(s):", plan.steps.len());
    for step in &plan.steps {
        println!("  {step:?}");
    }
    Ok(())
}

fn run_waste(engine: &Engine<MemoryStore>, args: &[String]) -> Result<(), Error> {
    let [id] = args else {
        return Err(Error::Validation("usage: waste --id <id>".into()));
    };
    engine
        .list_items()
        .into_iter()
        .find(|i| &i.item_id == id)
        .ok_or_else(|| Error::NotFound(format!("item {id}")))?;
    for entry in engine.waste_list() {
        if &entry.item_id == id {
            println!("{} is waste: {:?}", entry.item_id, entry.reason);
        }
    }
    Ok(())
}

fn run_logs(engine: &Engine<MemoryStore>, args: &[String]) -> Result<(), Error> {
    let filter = match args {
        [] => None,
        [flag, value] if flag == "--action" => Some(match value.as_str() {
            "add" => ActionType::Add,
            "placement" => ActionType::Placement,
            "retrieval" => ActionType::Retrieval,
            "waste" => ActionType::Waste,
            "disposal" => ActionType::Disposal,
            "search" => ActionType::Search,
            "rearrange" => ActionType::Rearrange,
            other => return Err(Error::Validation(format!("unknown action: {other}"))),
        }),
        _ => return Err(Error::Validation("usage: logs [--action <action>]".into())),
    };
    for entry in engine.logs(filter) {
        println!("{:?} {} {}", entry.action_type, entry.item_id, entry.timestamp);
    }
    Ok(())
}

fn dispatch(engine: &Engine<MemoryStore>, argv: &[String]) -> Result<(), Error> {
    let Some((command, rest)) = argv.split_first() else {
        return Err(Error::Validation("usage: <add|search|retrieve|waste|logs> [args...]".into()));
    };
    match command.as_str() {
        "add" => run_add(engine, rest),
        "search" => run_search(engine, rest),
        "retrieve" => run_retrieve(engine, rest),
        "waste" => run_waste(engine, rest),
        "logs" => run_logs(engine, rest),
        other => Err(Error::Validation(format!("unknown command: {other}"))),
    }
}

fn main() {
    let store = MemoryStore::new();
    store.seed_container(Container::new("contA", "General", 100, 100, 100));
    let engine = Engine::new(store, Utc::now()).expect("containers/items load from an empty store");

    let argv: Vec<String> = std::env::args().skip(1).collect();
    if argv.is_empty() {
        println!("=== CLI Surface Walkthrough ===\n");
        let scripted: &[&[&str]] = &[
            &["add", "X", "Widget", "10", "10", "10"],
            &["search", "Widget"],
            &["retrieve", "X"],
            &["logs"],
        ];
        let mut code = 0;
        for command in scripted {
            let args: Vec<String> = command.iter().map(|s| s.to_string()).collect();
            println!("$ {}", args.join(" "));
            if let Err(e) = dispatch(&engine, &args) {
                code = exit_code(&e);
                eprintln!("error: {e}");
            }
            println!();
        }
        std::process::exit(code);
    }

    if let Err(e) = dispatch(&engine, &argv) {
        eprintln!("error: {e}");
        std::process::exit(exit_code(&e));
    }
}

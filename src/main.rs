use std::{env, fs, process};

use tracing::info;
use tracing_subscriber::EnvFilter;

use tourney_core::{Set, SetRecord};

/// Inspector entry point: load a set record from a JSON file, rebuild
/// the set and print the derived snapshot.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(path) = env::args().nth(1) else {
        eprintln!("Usage: tourney-core <set-record.json>");
        process::exit(2);
    };

    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("read set record {path}: {e}");
            process::exit(1);
        }
    };
    let record: SetRecord = match serde_json::from_str(&data) {
        Ok(record) => record,
        Err(e) => {
            eprintln!("parse set record {path}: {e}");
            process::exit(1);
        }
    };
    let set = match Set::from_record(&record) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("rebuild set {}: {e}", record.id);
            process::exit(1);
        }
    };

    info!(
        "Loaded set {} ({} teams, {} matches, goal {})",
        set.id(),
        set.teams().len(),
        set.matches().len(),
        set.goal()
    );

    let snapshot = set.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(payload) => println!("{payload}"),
        Err(e) => {
            eprintln!("serialize snapshot: {e}");
            process::exit(1);
        }
    }
}

//! Bridge subcommand handlers.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use super::{bridge_path, index_path};
use crate::bridge::{IndexEngine, QueryBridge, QueryStatus};
use crate::cli::config::Config;
use crate::cli::output::{OutputFormat, print_json};
use crate::cli::{BridgeCommand, BridgeRunArgs, BridgeStatusArgs};

pub fn handle_bridge(command: &BridgeCommand, vault_dir: &Path, config: &Config) -> Result<()> {
    match command {
        BridgeCommand::Run(args) => handle_run(args, vault_dir, config),
        BridgeCommand::Status(args) => handle_status(args, vault_dir),
        BridgeCommand::Clear => handle_clear(vault_dir),
    }
}

fn open_bridge(vault_dir: &Path) -> Result<QueryBridge> {
    let path = bridge_path(vault_dir);
    QueryBridge::open(&path)
        .with_context(|| format!("failed to open bridge document at {}", path.display()))
}

fn handle_run(args: &BridgeRunArgs, vault_dir: &Path, config: &Config) -> Result<()> {
    let bridge = open_bridge(vault_dir)?;
    let engine = IndexEngine::new(index_path(vault_dir));
    let interval = config.poll_interval(args.interval);

    if args.once {
        let outcome = bridge.poll_once(&engine)?;
        if outcome.checked {
            println!("Handled availability probe");
        }
        println!(
            "{} succeeded, {} failed, {} purged",
            outcome.succeeded, outcome.failed, outcome.purged
        );
        return Ok(());
    }

    println!(
        "Polling {} every {interval}s (ctrl-c to stop)",
        bridge.path().display()
    );
    bridge.run(&engine, Duration::from_secs(interval))?;
    Ok(())
}

#[derive(Serialize)]
struct BridgeStatus {
    engine_available: bool,
    last_checked: Option<String>,
    pending: usize,
    completed: usize,
}

fn handle_status(args: &BridgeStatusArgs, vault_dir: &Path) -> Result<()> {
    let bridge = open_bridge(vault_dir)?;
    let (available, last_checked) = bridge.availability()?;
    let entries = bridge.entries()?;

    let pending = entries
        .iter()
        .filter(|(_, e)| e.status == QueryStatus::Pending)
        .count();
    let status = BridgeStatus {
        engine_available: available,
        last_checked: last_checked.map(|t| t.to_rfc3339()),
        pending,
        completed: entries.len() - pending,
    };

    match args.format {
        OutputFormat::Json => print_json(&status),
        OutputFormat::Human => {
            println!(
                "Engine available: {}",
                if status.engine_available { "yes" } else { "no" }
            );
            println!(
                "Last checked:     {}",
                status.last_checked.as_deref().unwrap_or("never")
            );
            println!("Pending queries:  {}", status.pending);
            println!("Completed:        {}", status.completed);
            Ok(())
        }
    }
}

fn handle_clear(vault_dir: &Path) -> Result<()> {
    let bridge = open_bridge(vault_dir)?;
    let cleared = bridge.clear()?;
    println!("Cleared {cleared} quer{}", if cleared == 1 { "y" } else { "ies" });
    Ok(())
}

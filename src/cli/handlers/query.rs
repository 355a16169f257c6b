//! Query submission handler.

use anyhow::{Result, bail};
use std::path::Path;
use std::time::Duration;

use super::bridge_path;
use crate::bridge::{QueryBridge, QueryStatus, QueryValue};
use crate::cli::QueryArgs;
use crate::cli::output::{OutputFormat, print_json};

/// How often the waiting side re-reads the bridge document.
const WAIT_INTERVAL: Duration = Duration::from_millis(100);

pub fn handle_query(args: &QueryArgs, vault_dir: &Path) -> Result<()> {
    let bridge = QueryBridge::open(bridge_path(vault_dir))?;
    let id = bridge.submit(&args.query)?;

    if args.no_wait {
        println!("{id}");
        return Ok(());
    }

    let entry = bridge.wait(&id, Duration::from_secs(args.timeout), WAIT_INTERVAL)?;
    let Some(entry) = entry else {
        bail!(
            "query {id} timed out after {}s; is `warren bridge run` running?",
            args.timeout
        );
    };

    match entry.status {
        QueryStatus::Success => {
            let Some(result) = entry.result else {
                bail!("query {id} succeeded but recorded no result");
            };
            match args.format {
                OutputFormat::Json => print_json(&result),
                OutputFormat::Human => {
                    print_result(&result);
                    Ok(())
                }
            }
        }
        QueryStatus::Error => {
            bail!(
                "query failed: {}",
                entry.error.unwrap_or_else(|| "unknown error".to_string())
            )
        }
        // wait() only returns terminal entries.
        QueryStatus::Pending => bail!("query {id} is still pending"),
    }
}

fn print_result(result: &QueryValue) {
    if !result.headers.is_empty() {
        println!("{}", result.headers.join("  |  "));
    }
    for value in &result.values {
        match value {
            serde_json::Value::Array(cells) => {
                let row: Vec<String> = cells.iter().map(render_cell).collect();
                println!("{}", row.join("  |  "));
            }
            other => println!("{}", render_cell(other)),
        }
    }
    println!();
    println!("{} result(s)", result.values.len());
}

fn render_cell(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

//! Link report handler.

use anyhow::Result;
use std::path::Path;

use super::load_index;
use crate::cli::LinksArgs;
use crate::cli::output::{LinkReport, OutputFormat, print_json};

pub fn handle_links(args: &LinksArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;

    // Paths that are only link targets still have an entry with backlinks.
    let entry = index.links.get(&args.path).cloned().unwrap_or_default();
    let report = LinkReport {
        path: args.path.clone(),
        outlinks: entry.outlinks,
        backlinks: entry.backlinks,
    };

    match args.format {
        OutputFormat::Json => print_json(&report),
        OutputFormat::Human => {
            println!("{}", report.path);
            println!();
            println!("Outlinks ({}):", report.outlinks.len());
            for link in &report.outlinks {
                println!("  -> {link}");
            }
            println!("Backlinks ({}):", report.backlinks.len());
            for link in &report.backlinks {
                println!("  <- {link}");
            }
            Ok(())
        }
    }
}

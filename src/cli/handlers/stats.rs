//! Stats command handler.

use anyhow::Result;
use std::path::Path;

use super::load_index;
use crate::cli::StatsArgs;
use crate::cli::output::{OutputFormat, print_json};

pub fn handle_stats(args: &StatsArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;
    let stats = &index.stats;

    match args.format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Human => {
            println!("Notes:            {}", stats.total_notes);
            println!("Tags:             {}", stats.total_tags);
            println!("Links:            {}", stats.total_links);
            println!("Embeds:           {}", stats.total_embeds);
            println!("Tasks:            {}", stats.total_tasks);
            println!("Incomplete tasks: {}", stats.total_incomplete_tasks);
            println!("Last updated:     {}", stats.last_updated.to_rfc3339());
            Ok(())
        }
    }
}

//! Task listing handler.

use anyhow::Result;
use std::path::Path;

use super::load_index;
use crate::cli::TasksArgs;
use crate::cli::output::{OutputFormat, TaskListing, print_json};

pub fn handle_tasks(args: &TasksArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;

    let wanted = if args.completed {
        Some(true)
    } else if args.incomplete {
        Some(false)
    } else {
        None
    };

    let listings: Vec<TaskListing> = index
        .notes
        .values()
        .flat_map(|note| {
            note.tasks.iter().map(|task| TaskListing {
                note: note.path.clone(),
                text: task.text.clone(),
                completed: task.completed,
                line: task.line,
            })
        })
        .filter(|task| wanted.is_none_or(|c| task.completed == c))
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&listings),
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No tasks found.");
                return Ok(());
            }
            for task in &listings {
                let marker = if task.completed { "[x]" } else { "[ ]" };
                println!("{} {}  ({}:{})", marker, task.text, task.note, task.line);
            }
            println!();
            println!("{} task(s)", listings.len());
            Ok(())
        }
    }
}

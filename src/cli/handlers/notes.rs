//! Notes listing and inspection handlers.

use anyhow::{Result, bail};
use std::path::Path;

use super::load_index;
use crate::cli::output::{NoteDetail, NoteListing, OutputFormat, print_json};
use crate::cli::{NoteSort, NotesCommand, NotesInfoArgs, NotesListArgs};
use crate::domain::DocumentRecord;

pub fn handle_notes(command: &NotesCommand, vault_dir: &Path) -> Result<()> {
    match command {
        NotesCommand::List(args) => handle_list(args, vault_dir),
        NotesCommand::Info(args) => handle_info(args, vault_dir),
    }
}

fn handle_list(args: &NotesListArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;

    let mut records: Vec<&DocumentRecord> = index.notes.values().collect();
    match args.sort {
        // The notes map is keyed by path, so it is already name-sorted.
        NoteSort::Name => {}
        NoteSort::Modified => records.sort_by(|a, b| b.modified.cmp(&a.modified)),
        NoteSort::Size => records.sort_by(|a, b| b.size.cmp(&a.size)),
    }
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    let listings: Vec<NoteListing> = records
        .iter()
        .map(|note| NoteListing {
            path: note.path.clone(),
            folder: note.folder.clone(),
            size: note.size,
            modified: note.modified.to_rfc3339(),
        })
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&listings),
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No notes found.");
                return Ok(());
            }
            for note in &listings {
                println!("{:<50} {:>8}  {}", note.path, note.size, note.modified);
            }
            println!();
            println!("{} note(s)", listings.len());
            Ok(())
        }
    }
}

fn handle_info(args: &NotesInfoArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;

    let Some(note) = index.notes.get(&args.path) else {
        bail!("note not found in index: {}", args.path);
    };
    let backlinks = index
        .links
        .get(&args.path)
        .map(|entry| entry.backlinks.clone())
        .unwrap_or_default();

    let detail = NoteDetail {
        path: note.path.clone(),
        folder: note.folder.clone(),
        size: note.size,
        created: note.created.to_rfc3339(),
        modified: note.modified.to_rfc3339(),
        tags: note.tags.clone(),
        outlinks: note.outlinks.clone(),
        backlinks,
        headings: note.headings.len(),
        tasks: note.tasks.len(),
        incomplete_tasks: note.incomplete_tasks(),
        code_blocks: note.code_blocks.clone(),
    };

    match args.format {
        OutputFormat::Json => print_json(&detail),
        OutputFormat::Human => {
            let folder = if detail.folder.is_empty() {
                "(root)"
            } else {
                &detail.folder
            };
            println!("{}", detail.path);
            println!();
            println!("Folder:    {folder}");
            println!("Size:      {}", detail.size);
            println!("Created:   {}", detail.created);
            println!("Modified:  {}", detail.modified);
            println!("Tags:      {}", join_or_none(&detail.tags));
            println!("Outlinks:  {}", join_or_none(&detail.outlinks));
            println!("Backlinks: {}", join_or_none(&detail.backlinks));
            println!("Headings:  {}", detail.headings);
            println!(
                "Tasks:     {} ({} incomplete)",
                detail.tasks, detail.incomplete_tasks
            );
            let code: Vec<String> = detail
                .code_blocks
                .iter()
                .map(|tally| format!("{} x{}", tally.language, tally.count))
                .collect();
            println!("Code:      {}", join_or_none(&code));
            Ok(())
        }
    }
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

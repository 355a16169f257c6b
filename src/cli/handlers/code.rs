//! Code block analytics handlers.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use super::load_index;
use crate::cli::output::{CodeNoteListing, CodeStat, OutputFormat, print_json};
use crate::cli::{CodeCommand, CodeNotesArgs, CodeSearchArgs, CodeStatsArgs};
use crate::index::IndexDocument;

pub fn handle_code(command: &CodeCommand, vault_dir: &Path) -> Result<()> {
    match command {
        CodeCommand::Stats(args) => handle_stats(args, vault_dir),
        CodeCommand::Notes(args) => handle_list(args.language.as_deref(), args.format, vault_dir),
        CodeCommand::Search(args) => handle_search(args, vault_dir),
    }
}

fn handle_stats(args: &CodeStatsArgs, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;

    // language -> (total blocks, notes containing it)
    let mut totals: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for note in index.notes.values() {
        for tally in &note.code_blocks {
            let entry = totals.entry(tally.language.as_str()).or_default();
            entry.0 += tally.count;
            entry.1 += 1;
        }
    }
    let stats: Vec<CodeStat> = totals
        .into_iter()
        .map(|(language, (blocks, notes))| CodeStat {
            language: language.to_string(),
            blocks,
            notes,
        })
        .collect();

    match args.format {
        OutputFormat::Json => print_json(&stats),
        OutputFormat::Human => {
            if stats.is_empty() {
                println!("No code blocks found.");
                return Ok(());
            }
            println!("{:<20} {:>7} {:>7}", "language", "blocks", "notes");
            for stat in &stats {
                println!("{:<20} {:>7} {:>7}", stat.language, stat.blocks, stat.notes);
            }
            Ok(())
        }
    }
}

fn handle_search(args: &CodeSearchArgs, vault_dir: &Path) -> Result<()> {
    handle_list(Some(&args.language), args.format, vault_dir)
}

fn handle_list(language: Option<&str>, format: OutputFormat, vault_dir: &Path) -> Result<()> {
    let index = load_index(vault_dir)?;
    let listings = notes_with_code(&index, language);

    match format {
        OutputFormat::Json => print_json(&listings),
        OutputFormat::Human => {
            if listings.is_empty() {
                println!("No matching notes found.");
                return Ok(());
            }
            for note in &listings {
                println!("{:<50} {:>5}", note.path, note.blocks);
            }
            println!();
            println!("{} note(s)", listings.len());
            Ok(())
        }
    }
}

/// Notes containing code blocks, with their block counts; `language` narrows
/// to blocks of that language only.
fn notes_with_code(index: &IndexDocument, language: Option<&str>) -> Vec<CodeNoteListing> {
    index
        .notes
        .values()
        .filter_map(|note| {
            let blocks: usize = note
                .code_blocks
                .iter()
                .filter(|tally| language.is_none_or(|l| tally.language == l))
                .map(|tally| tally.count)
                .sum();
            (blocks > 0).then(|| CodeNoteListing {
                path: note.path.clone(),
                blocks,
            })
        })
        .collect()
}

//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::CodeBlockTally;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Prints a value as pretty JSON to stdout.
pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A tag with its vault-wide count.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub name: String,
    pub count: usize,
}

/// A folder with its note count.
#[derive(Debug, Serialize)]
pub struct FolderListing {
    pub folder: String,
    pub count: usize,
}

/// A task with its source note.
#[derive(Debug, Serialize)]
pub struct TaskListing {
    pub note: String,
    pub text: String,
    pub completed: bool,
    pub line: usize,
}

/// Link report for one note.
#[derive(Debug, Serialize)]
pub struct LinkReport {
    pub path: String,
    pub outlinks: Vec<String>,
    pub backlinks: Vec<String>,
}

/// One row of the notes listing.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub path: String,
    pub folder: String,
    pub size: u64,
    pub modified: String,
}

/// Full indexed detail for one note.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDetail {
    pub path: String,
    pub folder: String,
    pub size: u64,
    pub created: String,
    pub modified: String,
    pub tags: Vec<String>,
    pub outlinks: Vec<String>,
    pub backlinks: Vec<String>,
    pub headings: usize,
    pub tasks: usize,
    pub incomplete_tasks: usize,
    pub code_blocks: Vec<CodeBlockTally>,
}

/// Vault-wide totals for one fence language.
#[derive(Debug, Serialize)]
pub struct CodeStat {
    pub language: String,
    pub blocks: usize,
    pub notes: usize,
}

/// A note with its code block count.
#[derive(Debug, Serialize)]
pub struct CodeNoteListing {
    pub path: String,
    pub blocks: usize,
}

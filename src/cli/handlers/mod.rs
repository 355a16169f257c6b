//! Command handlers for the CLI.

mod bridge;
mod code;
mod completions;
mod index;
mod links;
mod metadata;
mod notes;
mod query;
mod stats;
mod tasks;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::index::{FileResult, IndexDocument, ProgressReporter};
use crate::infra::JsonStore;

// Re-export public items
pub use bridge::handle_bridge;
pub use code::handle_code;
pub use completions::handle_completions;
pub use index::handle_index;
pub use links::handle_links;
pub use metadata::{handle_folders, handle_tags};
pub use notes::handle_notes;
pub use query::handle_query;
pub use stats::handle_stats;
pub use tasks::handle_tasks;

// ===========================================
// Shared Utilities
// ===========================================

/// Progress reporter that prints to stdout.
pub(crate) struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_file(&mut self, path: &str, result: FileResult) {
        if self.verbose {
            match result {
                FileResult::Indexed => println!("  indexed: {path}"),
                FileResult::Error(msg) => eprintln!("  error: {path}: {msg}"),
            }
        }
    }

    fn on_complete(&mut self, indexed: usize, errors: usize) {
        if errors > 0 {
            eprintln!("Indexed {indexed} notes with {errors} errors");
        } else {
            println!("Indexed {indexed} notes");
        }
    }
}

/// Returns the index document path for a vault directory.
pub(crate) fn index_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join(".warren").join("index.json")
}

/// Returns the bridge document path for a vault directory.
pub(crate) fn bridge_path(vault_dir: &Path) -> PathBuf {
    vault_dir.join(".warren").join("bridge.json")
}

/// Reads the index document for read-only commands.
pub(crate) fn load_index(vault_dir: &Path) -> Result<IndexDocument> {
    let path = index_path(vault_dir);
    let store: JsonStore<IndexDocument> = JsonStore::new(&path);
    store.read().with_context(|| {
        format!(
            "failed to read index at {} (run `warren index` first)",
            path.display()
        )
    })
}

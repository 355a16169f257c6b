//! Index command handler.

use anyhow::{Context, Result};
use std::path::Path;

use super::{ConsoleReporter, index_path};
use crate::cli::IndexArgs;
use crate::index::{IndexBuilder, IndexError, IndexStore};
use crate::infra::StorageError;
use crate::vault::FsVault;

pub fn handle_index(_args: &IndexArgs, vault_dir: &Path, verbose: bool) -> Result<()> {
    let vault = FsVault::open(vault_dir)
        .with_context(|| format!("failed to open vault at {}", vault_dir.display()))?;

    let path = index_path(vault_dir);
    let mut store = match IndexStore::open(&path) {
        Ok(store) => store,
        // A rebuild is the supported recovery for a corrupt index.
        Err(IndexError::Storage(StorageError::Corrupt { .. })) => {
            eprintln!("warning: existing index is corrupt, rebuilding from scratch");
            IndexStore::create(&path)
                .with_context(|| format!("failed to recreate index at {}", path.display()))?
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to open index at {}", path.display()));
        }
    };

    println!("Rebuilding index...");
    let builder = IndexBuilder::new(&vault);
    let mut reporter = ConsoleReporter::new(verbose);
    let result = builder
        .full_rebuild_with_progress(&mut store, &mut reporter)
        .with_context(|| "failed to rebuild index")?;

    for error in &result.errors {
        eprintln!("  {error}");
    }

    Ok(())
}

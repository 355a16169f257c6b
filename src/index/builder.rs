//! Rebuild coordination and event-driven index maintenance.

use crate::domain::{DocumentRecord, EventKind, VaultEvent};
use crate::extract::extract;
use crate::index::{IndexResult, IndexStore};
use crate::vault::{DocumentStore, VaultError};
use std::path::Path;
use std::sync::mpsc::Receiver;
use tracing::{info, warn};

// ===========================================
// BuildError Type
// ===========================================

/// Errors that can occur when indexing individual documents.
///
/// These are collected per document and never abort a rebuild; a single
/// malformed document must not prevent indexing the rest.
#[derive(Debug)]
pub enum BuildError {
    /// Failed to read the document or its attributes.
    Read { path: String, message: String },
}

impl BuildError {
    /// Returns the path of the document that caused the error.
    pub fn path(&self) -> &str {
        match self {
            BuildError::Read { path, .. } => path,
        }
    }

    /// Returns the error message.
    pub fn message(&self) -> &str {
        match self {
            BuildError::Read { message, .. } => message,
        }
    }
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path(), self.message())
    }
}

impl std::error::Error for BuildError {}

/// Result of a full index rebuild.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of documents successfully indexed.
    pub indexed: usize,
    /// Per-document errors that occurred during the rebuild.
    pub errors: Vec<BuildError>,
}

// ===========================================
// Progress Reporting
// ===========================================

/// Result of processing a single document.
#[derive(Debug, Clone)]
pub enum FileResult {
    /// Document was indexed successfully.
    Indexed,
    /// Error occurred while processing the document.
    Error(String),
}

/// Trait for receiving progress updates during a rebuild.
pub trait ProgressReporter {
    /// Called when a document is processed.
    fn on_file(&mut self, path: &str, result: FileResult);
    /// Called when the rebuild is complete.
    fn on_complete(&mut self, indexed: usize, errors: usize);
}

/// A no-op progress reporter.
#[derive(Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_file(&mut self, _path: &str, _result: FileResult) {}
    fn on_complete(&mut self, _indexed: usize, _errors: usize) {}
}

// ===========================================
// IndexBuilder
// ===========================================

/// Coordinates extraction against a document store.
///
/// Supports full rebuilds (clear and re-extract everything, in the store's
/// enumeration order) and the application of individual change events. The
/// builder borrows the store it reads from; the `IndexStore` it mutates is
/// passed per call so one builder can serve both the rebuild path and the
/// event loop.
pub struct IndexBuilder<'a> {
    vault: &'a dyn DocumentStore,
}

impl<'a> IndexBuilder<'a> {
    /// Creates a builder over the given document store.
    pub fn new(vault: &'a dyn DocumentStore) -> Self {
        Self { vault }
    }

    /// Performs a full rebuild of the index.
    ///
    /// Clears the index, re-extracts every document the store enumerates,
    /// then recomputes aggregates once at the end. Individual document
    /// failures are collected in the returned `BuildResult`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be enumerated or if persisting
    /// the index fails.
    pub fn full_rebuild(&self, store: &mut IndexStore) -> IndexResult<BuildResult> {
        self.full_rebuild_with_progress(store, &mut NoopReporter)
    }

    /// Performs a full rebuild with progress reporting.
    pub fn full_rebuild_with_progress<P: ProgressReporter>(
        &self,
        store: &mut IndexStore,
        progress: &mut P,
    ) -> IndexResult<BuildResult> {
        self.vault.refresh();
        store.clear()?;

        let paths = self.enumerate()?;
        let mut indexed = 0;
        let mut errors = Vec::new();

        for path in paths {
            match self.index_document(&path) {
                Ok(record) => {
                    store.stage(record);
                    indexed += 1;
                    progress.on_file(&path, FileResult::Indexed);
                }
                Err(e) => {
                    progress.on_file(&path, FileResult::Error(e.message().to_string()));
                    errors.push(e);
                }
            }
        }

        // One aggregate pass for the whole rebuild instead of one per
        // document; steady-state mutations still recompute per operation.
        store.commit()?;

        info!(indexed, errors = errors.len(), "rebuild complete");
        progress.on_complete(indexed, errors.len());
        Ok(BuildResult { indexed, errors })
    }

    /// Extracts one document into a record.
    ///
    /// # Errors
    ///
    /// Returns `BuildError::Read` if content or attributes cannot be read.
    /// Unresolvable link references are not errors; they are dropped during
    /// extraction.
    pub fn index_document(&self, path: &str) -> Result<DocumentRecord, BuildError> {
        let content = self.vault.read(path).map_err(|e| read_error(path, e))?;
        let stat = self.vault.stat(path).map_err(|e| read_error(path, e))?;
        let meta = self.vault.metadata(path).map_err(|e| read_error(path, e))?;

        let fields = extract(&meta, &content, |r| self.vault.resolve(r, path));

        let (folder, file_name) = match path.rsplit_once('/') {
            Some((folder, file)) => (folder.to_string(), file),
            None => (String::new(), path),
        };
        let stem = Path::new(file_name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_name.to_string());
        let extension = Path::new(file_name)
            .extension()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(DocumentRecord {
            path: path.to_string(),
            basename: stem,
            extension,
            size: stat.size,
            created: stat.created,
            modified: stat.modified,
            folder,
            tags: fields.tags,
            outlinks: fields.outlinks,
            embeds: fields.embeds,
            frontmatter: fields.frontmatter,
            headings: fields.headings,
            tasks: fields.tasks,
            code_blocks: fields.code_blocks,
        })
    }

    /// Applies one change event to the index.
    ///
    /// Extraction failures are logged and skipped (the event source is
    /// best-effort about metadata availability); persistence failures
    /// propagate.
    pub fn apply_event(&self, store: &mut IndexStore, event: &VaultEvent) -> IndexResult<()> {
        // The event implies the store's contents changed; any enumeration
        // cached for reference resolution is stale.
        self.vault.refresh();
        match &event.kind {
            EventKind::Created | EventKind::Modified => self.reindex(store, &event.path),
            EventKind::Deleted => {
                store.delete(&event.path)?;
                Ok(())
            }
            EventKind::Renamed { from } => {
                store.delete(from)?;
                self.reindex(store, &event.path)
            }
        }
    }

    /// Consumes events until the channel closes, applying each in order.
    ///
    /// This is the single coordinating loop that serializes all mutating
    /// read-modify-write cycles against the index document.
    pub fn run_event_loop(
        &self,
        store: &mut IndexStore,
        events: Receiver<VaultEvent>,
    ) -> IndexResult<()> {
        for event in events {
            self.apply_event(store, &event)?;
        }
        Ok(())
    }

    fn reindex(&self, store: &mut IndexStore, path: &str) -> IndexResult<()> {
        match self.index_document(path) {
            Ok(record) => store.upsert(record),
            Err(e) => {
                warn!(path, error = %e, "skipping unreadable document");
                Ok(())
            }
        }
    }

    fn enumerate(&self) -> IndexResult<Vec<String>> {
        // Enumeration failure aborts the rebuild; it is not a per-document
        // condition.
        self.vault.enumerate().map_err(|e| {
            crate::infra::StorageError::Io {
                path: std::path::PathBuf::new(),
                source: std::io::Error::other(e.to_string()),
            }
            .into()
        })
    }
}

fn read_error(path: &str, error: VaultError) -> BuildError {
    BuildError::Read {
        path: path.to_string(),
        message: error.to_string(),
    }
}

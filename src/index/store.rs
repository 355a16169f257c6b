//! The index store: owns the persisted index document and its mutations.

use crate::domain::DocumentRecord;
use crate::index::aggregate::recompute;
use crate::index::document::IndexDocument;
use crate::infra::{JsonStore, StorageError};
use chrono::Utc;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur during index operations.
#[derive(Debug, Error)]
pub enum IndexError {
    /// Persistence failure; the prior on-disk state remains the last
    /// committed version.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// Owner of the persisted index document.
///
/// All mutating operations take `&mut self`, so a store shared between tasks
/// serializes its read-modify-write cycles at compile time. Every mutation
/// recomputes the aggregates in full and persists the whole document before
/// returning.
#[derive(Debug)]
pub struct IndexStore {
    storage: JsonStore<IndexDocument>,
    doc: IndexDocument,
}

impl IndexStore {
    /// Opens the store, initializing an empty document if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::Storage` with a `Corrupt` source if the file
    /// exists but cannot be parsed. That condition is not recovered here;
    /// the caller should offer a full rebuild.
    pub fn open(path: impl AsRef<Path>) -> IndexResult<Self> {
        let storage = JsonStore::new(path.as_ref());
        let doc = storage.read_or_init()?;
        Ok(Self { storage, doc })
    }

    /// Opens the store discarding any existing file content.
    ///
    /// Used to recover from a corrupt document ahead of a full rebuild.
    pub fn create(path: impl AsRef<Path>) -> IndexResult<Self> {
        let storage = JsonStore::new(path.as_ref());
        let doc = IndexDocument::default();
        storage.write(&doc)?;
        Ok(Self { storage, doc })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Returns the current in-memory document.
    pub fn document(&self) -> &IndexDocument {
        &self.doc
    }

    /// Replaces the record at the record's own path, wholesale.
    ///
    /// Aggregates are recomputed and the document persisted before returning.
    pub fn upsert(&mut self, record: DocumentRecord) -> IndexResult<()> {
        debug!(path = %record.path, "upsert");
        self.doc.notes.insert(record.path.clone(), record);
        self.commit()
    }

    /// Removes the record at `path` if present; absent paths are not an
    /// error. Returns whether a record was removed.
    pub fn delete(&mut self, path: &str) -> IndexResult<bool> {
        let removed = self.doc.notes.remove(path).is_some();
        debug!(path, removed, "delete");
        self.commit()?;
        Ok(removed)
    }

    /// Replaces the entire document with empty defaults and persists.
    pub fn clear(&mut self) -> IndexResult<()> {
        self.doc = IndexDocument::default();
        self.commit()
    }

    /// Inserts a record without recomputing aggregates or persisting.
    ///
    /// Used by the rebuild coordinator to defer the aggregate pass to one
    /// `commit` at the end. Steady-state mutations go through `upsert`.
    pub fn stage(&mut self, record: DocumentRecord) {
        self.doc.notes.insert(record.path.clone(), record);
    }

    /// Recomputes all aggregates from the current notes map and persists the
    /// whole document.
    pub fn commit(&mut self) -> IndexResult<()> {
        let agg = recompute(&self.doc.notes, Utc::now());
        self.doc.tags = agg.tags;
        self.doc.folders = agg.folders;
        self.doc.links = agg.links;
        self.doc.stats = agg.stats;
        self.storage.write(&self.doc)?;
        Ok(())
    }
}

//! JSON document persistence with atomic writes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{self, Write as IoWrite};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Errors during document persistence.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("document file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("document at {path} is not parseable: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("atomic write failed for {path}: {source}")]
    AtomicWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StorageError {
    /// Creates an appropriate StorageError from an io::Error.
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => StorageError::NotFound { path: path.into() },
            _ => StorageError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// A single JSON document persisted to one file.
///
/// The whole document is serialized and rewritten on every `write`. Writes go
/// through a temporary file in the same directory followed by an atomic
/// rename, so a reader never observes a truncated document.
#[derive(Debug, Clone)]
pub struct JsonStore<T> {
    path: PathBuf,
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    /// Creates a store backed by the given file path.
    ///
    /// The file is not touched until `read_or_init` or `write` is called.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _marker: PhantomData,
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads and deserializes the whole document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the file doesn't exist.
    /// Returns `StorageError::Corrupt` if the file exists but is not valid JSON
    /// for the document type.
    pub fn read(&self) -> StorageResult<T> {
        let bytes =
            std::fs::read(&self.path).map_err(|e| StorageError::from_io(&self.path, e))?;
        serde_json::from_slice(&bytes).map_err(|e| StorageError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }

    /// Reads the document, initializing the file with defaults if absent.
    ///
    /// A corrupt file is not recovered here; it is surfaced so the caller can
    /// offer a rebuild.
    pub fn read_or_init(&self) -> StorageResult<T> {
        match self.read() {
            Ok(doc) => Ok(doc),
            Err(StorageError::NotFound { .. }) => {
                let doc = T::default();
                self.write(&doc)?;
                Ok(doc)
            }
            Err(e) => Err(e),
        }
    }

    /// Serializes and overwrites the backing file in full.
    ///
    /// Parent directories are created as needed. The write is atomic: content
    /// goes to a temporary file which is renamed over the target.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the temp file cannot be created or
    /// written, or `StorageError::AtomicWrite` if the rename fails.
    pub fn write(&self, value: &T) -> StorageResult<()> {
        let parent = self.path.parent().unwrap_or_else(|| Path::new("."));
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StorageError::from_io(parent, e))?;
        }

        let content = serde_json::to_vec_pretty(value).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: io::Error::other(e.to_string()),
        })?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        temp.write_all(&content).map_err(|e| StorageError::Io {
            path: self.path.clone(),
            source: e,
        })?;

        temp.persist(&self.path).map_err(|e| StorageError::AtomicWrite {
            path: self.path.clone(),
            source: e.error,
        })?;

        Ok(())
    }
}

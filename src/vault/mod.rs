//! Access to the document collection backing the index.
//!
//! `DocumentStore` is the seam to the host application's storage: the index
//! engine only enumerates documents, reads raw content, and resolves
//! link/embed references through it. `FsVault` is the filesystem-backed
//! implementation used by the CLI.

use crate::extract::{DocMetadata, derive_metadata};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors during document store operations.
#[derive(Debug, Error)]
pub enum VaultError {
    #[error("document not found: {path}")]
    NotFound { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VaultError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => VaultError::NotFound { path: path.into() },
            _ => VaultError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Result type for document store operations.
pub type VaultResult<T> = Result<T, VaultError>;

/// File-system attributes of one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocStat {
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

/// The document collection consumed by the index engine.
///
/// Paths are vault-relative and use `/` as the separator.
pub trait DocumentStore {
    /// Enumerates all document paths in the store's order.
    fn enumerate(&self) -> VaultResult<Vec<String>>;

    /// Reads a document's raw text.
    fn read(&self, path: &str) -> VaultResult<String>;

    /// Returns a document's file-system attributes.
    fn stat(&self, path: &str) -> VaultResult<DocStat>;

    /// Returns the host-derived structured metadata for a document.
    fn metadata(&self, path: &str) -> VaultResult<DocMetadata>;

    /// Resolves a link/embed reference to a canonical document path, given
    /// the path of the document containing the reference. Returns `None`
    /// when the reference does not resolve.
    fn resolve(&self, reference: &str, source: &str) -> Option<String>;

    /// Discards any state cached from earlier enumeration. Called before a
    /// batch of operations whose inputs may have changed on disk.
    fn refresh(&self) {}
}

/// A vault rooted at a directory of markdown files.
///
/// Basename resolution reuses one enumeration across a batch of `resolve`
/// calls; `refresh` invalidates it when the directory may have changed.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
    basename_cache: Mutex<Option<Vec<String>>>,
}

impl FsVault {
    /// Opens a vault at the given root directory.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::NotFound` if the directory doesn't exist and
    /// `VaultError::NotADirectory` if the path is not a directory.
    pub fn open(root: impl Into<PathBuf>) -> VaultResult<Self> {
        let root = root.into();
        if !root.exists() {
            return Err(VaultError::NotFound { path: root });
        }
        if !root.is_dir() {
            return Err(VaultError::NotADirectory { path: root });
        }
        Ok(Self {
            root,
            basename_cache: Mutex::new(None),
        })
    }

    /// Returns the vault root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full_path(&self, path: &str) -> PathBuf {
        self.root.join(path)
    }

    fn is_document(&self, path: &str) -> bool {
        let full = self.full_path(path);
        full.is_file() && full.extension().is_some_and(|e| e == "md")
    }

    /// First enumeration-order path whose file stem matches `reference`,
    /// walking the vault at most once between refreshes.
    fn find_by_basename(&self, reference: &str) -> Option<String> {
        let mut cache = self
            .basename_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if cache.is_none() {
            *cache = Some(self.enumerate().ok()?);
        }
        cache.as_ref()?.iter().find_map(|p| {
            Path::new(p)
                .file_stem()
                .is_some_and(|stem| stem.to_string_lossy() == reference)
                .then(|| p.clone())
        })
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Converts a relative path to the vault's `/`-separated string form.
fn relative_key(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl DocumentStore for FsVault {
    fn enumerate(&self) -> VaultResult<Vec<String>> {
        let mut paths = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

        for entry in walker {
            let entry = entry.map_err(|e| VaultError::Io {
                path: self.root.clone(),
                source: io::Error::other(e.to_string()),
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if entry.path().extension().is_none_or(|e| e != "md") {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&self.root) {
                paths.push(relative_key(relative));
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn read(&self, path: &str) -> VaultResult<String> {
        let full = self.full_path(path);
        std::fs::read_to_string(&full).map_err(|e| VaultError::from_io(&full, e))
    }

    fn stat(&self, path: &str) -> VaultResult<DocStat> {
        let full = self.full_path(path);
        let meta = std::fs::metadata(&full).map_err(|e| VaultError::from_io(&full, e))?;
        let modified = meta
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());
        // Creation time is not available on all platforms.
        let created = meta
            .created()
            .map(DateTime::<Utc>::from)
            .unwrap_or(modified);

        Ok(DocStat {
            size: meta.len(),
            created,
            modified,
        })
    }

    fn metadata(&self, path: &str) -> VaultResult<DocMetadata> {
        Ok(derive_metadata(&self.read(path)?))
    }

    fn resolve(&self, reference: &str, source: &str) -> Option<String> {
        let reference = reference.trim();
        if reference.is_empty() {
            return None;
        }

        // Exact vault-relative path, with and without the markdown extension.
        if self.is_document(reference) {
            return Some(reference.to_string());
        }
        let with_ext = format!("{reference}.md");
        if self.is_document(&with_ext) {
            return Some(with_ext);
        }

        // Sibling of the referencing document.
        if let Some((folder, _)) = source.rsplit_once('/') {
            let sibling = format!("{folder}/{reference}.md");
            if self.is_document(&sibling) {
                return Some(sibling);
            }
        }

        // First basename match anywhere in the vault, in enumeration order.
        self.find_by_basename(reference)
    }

    fn refresh(&self) {
        *self
            .basename_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

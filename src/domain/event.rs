//! Change notifications delivered by the document store.

/// What happened to a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// A new document appeared at the path.
    Created,
    /// An existing document's content or metadata changed.
    Modified,
    /// The document at the path was removed.
    Deleted,
    /// The document moved; `from` is its previous vault-relative path.
    Renamed { from: String },
}

/// One change notification for a vault-relative path.
///
/// Events are consumed by a single coordinating loop so that the
/// read-modify-write cycles they trigger against the index document are
/// never interleaved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultEvent {
    /// Vault-relative path the event applies to.
    pub path: String,
    pub kind: EventKind,
}

impl VaultEvent {
    pub fn created(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Created,
        }
    }

    pub fn modified(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Modified,
        }
    }

    pub fn deleted(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EventKind::Deleted,
        }
    }

    pub fn renamed(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            path: to.into(),
            kind: EventKind::Renamed { from: from.into() },
        }
    }
}

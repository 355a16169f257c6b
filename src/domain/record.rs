//! Per-document index record and its nested entry types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The derived, queryable record for one document in the vault.
///
/// Records are replaced wholesale on every re-extraction; there are no
/// partial field updates. The `path` is the vault-relative key (with `/`
/// separators) and matches the record's key in the index document's `notes`
/// map. Serialized field names are camelCase to match the external file
/// format read by downstream tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Vault-relative path, the stable identifier.
    pub path: String,
    /// File name without extension.
    pub basename: String,
    /// File extension without the leading dot.
    pub extension: String,
    /// File size in bytes.
    pub size: u64,
    /// Creation timestamp from file-system attributes.
    pub created: DateTime<Utc>,
    /// Last-modified timestamp from file-system attributes.
    pub modified: DateTime<Utc>,
    /// Parent folder path, empty for the vault root.
    #[serde(default)]
    pub folder: String,
    /// Deduplicated union of inline and frontmatter tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Resolved outgoing link targets, in source order.
    #[serde(default)]
    pub outlinks: Vec<String>,
    /// Resolved embed targets, in source order.
    #[serde(default)]
    pub embeds: Vec<String>,
    /// Opaque frontmatter key/value mapping.
    #[serde(default)]
    pub frontmatter: BTreeMap<String, serde_json::Value>,
    /// Headings in document order.
    #[serde(default)]
    pub headings: Vec<Heading>,
    /// Checkbox tasks in document order.
    #[serde(default)]
    pub tasks: Vec<TaskEntry>,
    /// Per-language code block tallies.
    #[serde(default)]
    pub code_blocks: Vec<CodeBlockTally>,
}

/// One heading within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Heading level, 1 through 6.
    pub level: u8,
    /// Heading text with the marker stripped.
    pub text: String,
}

/// One checkbox task within a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskEntry {
    /// Checkbox line content with the checkbox syntax stripped.
    pub text: String,
    /// True unless the checkbox marker is exactly a single space.
    pub completed: bool,
    /// 1-based source line number at detection time. Not stable across edits.
    pub line: usize,
}

/// Code blocks of one language within a single document, collapsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlockTally {
    /// Fence language token, or `unknown` when absent.
    pub language: String,
    /// Number of blocks of this language in the document.
    pub count: usize,
}

impl DocumentRecord {
    /// Number of tasks in this record that are not completed.
    pub fn incomplete_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.completed).count()
    }
}

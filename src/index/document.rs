//! The persisted index document and its aggregate sections.

use crate::domain::DocumentRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Folder aggregate key used for notes in the vault root.
pub const ROOT_FOLDER: &str = "root";

/// The root persisted structure: per-note records plus vault-wide aggregates.
///
/// Aggregates (`tags`, `folders`, `links`, `stats`) are derived from `notes`
/// and fully replaced after every mutation; they are never merged
/// incrementally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndexDocument {
    #[serde(default)]
    pub notes: BTreeMap<String, DocumentRecord>,
    #[serde(default)]
    pub tags: BTreeMap<String, usize>,
    #[serde(default)]
    pub folders: BTreeMap<String, usize>,
    #[serde(default)]
    pub links: BTreeMap<String, LinkEntry>,
    #[serde(default)]
    pub stats: VaultStats,
}

/// Forward and reverse link sets for one path.
///
/// A path can appear here without being a key of `notes`: link targets that
/// are not themselves indexed still carry backlinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkEntry {
    #[serde(default)]
    pub outlinks: Vec<String>,
    #[serde(default)]
    pub backlinks: Vec<String>,
}

/// Scalar statistics over the whole vault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultStats {
    pub total_notes: usize,
    pub total_tags: usize,
    pub total_links: usize,
    pub total_embeds: usize,
    pub total_tasks: usize,
    pub total_incomplete_tasks: usize,
    /// Updated on every mutation, serialized as ISO-8601.
    pub last_updated: DateTime<Utc>,
}

impl Default for VaultStats {
    fn default() -> Self {
        Self {
            total_notes: 0,
            total_tags: 0,
            total_links: 0,
            total_embeds: 0,
            total_tasks: 0,
            total_incomplete_tasks: 0,
            last_updated: DateTime::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_serializes_all_sections() {
        let doc = IndexDocument::default();
        let json = serde_json::to_value(&doc).unwrap();

        for key in ["notes", "tags", "folders", "links", "stats"] {
            assert!(json.get(key).is_some(), "missing top-level key {key}");
        }
    }

    #[test]
    fn stats_serialize_with_camel_case_keys() {
        let json = serde_json::to_value(VaultStats::default()).unwrap();

        assert!(json.get("totalNotes").is_some());
        assert!(json.get("totalIncompleteTasks").is_some());
        assert!(json.get("lastUpdated").is_some());
    }

    #[test]
    fn document_round_trips_through_json() {
        let mut doc = IndexDocument::default();
        doc.tags.insert("rust".into(), 2);
        doc.links.insert(
            "a.md".into(),
            LinkEntry {
                outlinks: vec!["b.md".into()],
                backlinks: vec![],
            },
        );

        let json = serde_json::to_string(&doc).unwrap();
        let back: IndexDocument = serde_json::from_str(&json).unwrap();

        assert_eq!(back, doc);
    }
}

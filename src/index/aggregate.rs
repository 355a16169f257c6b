//! Full recomputation of vault-wide aggregates from the notes map.

use crate::domain::DocumentRecord;
use crate::index::document::{LinkEntry, ROOT_FOLDER, VaultStats};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// The aggregate sections derived from one pass over the notes map.
///
/// The result fully replaces the index document's `tags`, `folders`, `links`
/// and `stats` sections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregates {
    pub tags: BTreeMap<String, usize>,
    pub folders: BTreeMap<String, usize>,
    pub links: BTreeMap<String, LinkEntry>,
    pub stats: VaultStats,
}

/// Recomputes every aggregate from the current notes map.
///
/// Pure and O(total notes + total links). Backlinks are derived from forward
/// links on every call, so they are never stale; targets that are not
/// indexed notes still receive a link entry with backlinks only.
pub fn recompute(
    notes: &BTreeMap<String, DocumentRecord>,
    now: DateTime<Utc>,
) -> Aggregates {
    let mut agg = Aggregates::default();
    let mut total_links = 0;
    let mut total_embeds = 0;
    let mut total_tasks = 0;
    let mut total_incomplete = 0;

    for note in notes.values() {
        for tag in &note.tags {
            *agg.tags.entry(tag.clone()).or_insert(0) += 1;
        }

        let folder = if note.folder.is_empty() {
            ROOT_FOLDER
        } else {
            note.folder.as_str()
        };
        *agg.folders.entry(folder.to_string()).or_insert(0) += 1;

        let entry = agg.links.entry(note.path.clone()).or_default();
        entry.outlinks = note.outlinks.clone();

        for target in &note.outlinks {
            let backlinks = &mut agg.links.entry(target.clone()).or_default().backlinks;
            if !backlinks.contains(&note.path) {
                backlinks.push(note.path.clone());
            }
        }

        total_links += note.outlinks.len();
        total_embeds += note.embeds.len();
        total_tasks += note.tasks.len();
        total_incomplete += note.incomplete_tasks();
    }

    agg.stats = VaultStats {
        total_notes: notes.len(),
        total_tags: agg.tags.len(),
        total_links,
        total_embeds,
        total_tasks,
        total_incomplete_tasks: total_incomplete,
        last_updated: now,
    };

    agg
}

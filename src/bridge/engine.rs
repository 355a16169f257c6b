//! The query engine seam and the built-in index-backed engine.

use crate::bridge::document::QueryValue;
use crate::index::IndexDocument;
use crate::infra::JsonStore;
use std::path::Path;
use thiserror::Error;

/// Failure reported by an engine for one query; the message is passed
/// through to the entry verbatim.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct EngineError(pub String);

/// The external query engine invoked by the bridge.
///
/// Treated as an opaque capability: availability is a separate boolean
/// check, and `execute` is assumed to complete in bounded time. No timeout
/// is enforced here; a hung engine stalls that poll cycle.
pub trait QueryEngine {
    /// Whether the engine is present and ready.
    fn available(&self) -> bool;

    /// Executes one query, returning a normalized result or an error
    /// message.
    fn execute(&self, query: &str) -> Result<QueryValue, EngineError>;
}

/// A minimal engine answering `LIST` queries from the persisted index
/// document, so the bridge is operable without the host application.
///
/// Supported queries: `LIST tags`, `LIST folders`, `LIST tasks`,
/// `LIST notes`, `LIST code`. Anything else fails with an unsupported-query
/// message.
#[derive(Debug)]
pub struct IndexEngine {
    storage: JsonStore<IndexDocument>,
}

impl IndexEngine {
    /// Creates an engine reading the index document at the given path.
    pub fn new(index_path: impl AsRef<Path>) -> Self {
        Self {
            storage: JsonStore::new(index_path.as_ref()),
        }
    }

    fn index(&self) -> Result<IndexDocument, EngineError> {
        self.storage.read().map_err(|e| EngineError(e.to_string()))
    }
}

impl QueryEngine for IndexEngine {
    fn available(&self) -> bool {
        self.storage.read().is_ok()
    }

    fn execute(&self, query: &str) -> Result<QueryValue, EngineError> {
        let mut words = query.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let subject = words.next().unwrap_or_default();

        if !verb.eq_ignore_ascii_case("list") || words.next().is_some() {
            return Err(EngineError(format!("unsupported query: {query}")));
        }

        let index = self.index()?;
        match subject.to_ascii_lowercase().as_str() {
            "tags" => Ok(table(
                &["tag", "count"],
                &["string", "number"],
                index
                    .tags
                    .iter()
                    .map(|(tag, count)| serde_json::json!([tag, count]))
                    .collect(),
            )),
            "folders" => Ok(table(
                &["folder", "count"],
                &["string", "number"],
                index
                    .folders
                    .iter()
                    .map(|(folder, count)| serde_json::json!([folder, count]))
                    .collect(),
            )),
            "tasks" => Ok(table(
                &["note", "text", "completed", "line"],
                &["string", "string", "boolean", "number"],
                index
                    .notes
                    .values()
                    .flat_map(|note| {
                        note.tasks.iter().map(|task| {
                            serde_json::json!([
                                note.path,
                                task.text,
                                task.completed,
                                task.line
                            ])
                        })
                    })
                    .collect(),
            )),
            "code" => {
                let mut totals: std::collections::BTreeMap<&str, usize> =
                    std::collections::BTreeMap::new();
                for note in index.notes.values() {
                    for tally in &note.code_blocks {
                        *totals.entry(tally.language.as_str()).or_insert(0) += tally.count;
                    }
                }
                Ok(table(
                    &["language", "blocks"],
                    &["string", "number"],
                    totals
                        .iter()
                        .map(|(language, blocks)| serde_json::json!([language, blocks]))
                        .collect(),
                ))
            }
            "notes" => Ok(QueryValue {
                kind: "list".into(),
                headers: Vec::new(),
                values: index
                    .notes
                    .keys()
                    .map(|path| serde_json::Value::String(path.clone()))
                    .collect(),
                column_types: None,
            }),
            _ => Err(EngineError(format!("unsupported query: {query}"))),
        }
    }
}

fn table(headers: &[&str], types: &[&str], values: Vec<serde_json::Value>) -> QueryValue {
    QueryValue {
        kind: "table".into(),
        headers: headers.iter().map(|h| h.to_string()).collect(),
        values,
        column_types: Some(types.iter().map(|t| t.to_string()).collect()),
    }
}

//! The persisted bridge document: the query request/response queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Current bridge document format version.
pub const BRIDGE_VERSION: u32 = 1;

/// Reserved control id requesting an engine availability probe.
pub const CHECK_ID: &str = "_check";

/// Returns true for ids that signal an operational command rather than a
/// user query.
pub fn is_control(id: &str) -> bool {
    id.starts_with('_')
}

/// The bridge's persisted state. The file is the queue: the bridge holds no
/// in-memory state between poll cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeDocument {
    pub version: u32,
    pub external_engine_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<DateTime<Utc>>,
    #[serde(default)]
    pub queries: BTreeMap<String, QueryEntry>,
}

impl Default for BridgeDocument {
    fn default() -> Self {
        Self {
            version: BRIDGE_VERSION,
            external_engine_available: false,
            last_checked: None,
            queries: BTreeMap::new(),
        }
    }
}

/// One query request and, once processed, its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEntry {
    /// Source query text. Absent for control entries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    pub status: QueryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<QueryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Set on every status transition.
    pub timestamp: DateTime<Utc>,
}

impl QueryEntry {
    /// Creates a fresh pending entry for a user query.
    pub fn pending(query: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            query: Some(query.into()),
            status: QueryStatus::Pending,
            result: None,
            error: None,
            timestamp: now,
        }
    }

    /// Creates a pending control entry (no query text).
    pub fn control(now: DateTime<Utc>) -> Self {
        Self {
            query: None,
            status: QueryStatus::Pending,
            result: None,
            error: None,
            timestamp: now,
        }
    }

    /// True once the entry has reached `success` or `error`. Terminal states
    /// are never re-entered automatically.
    pub fn is_terminal(&self) -> bool {
        matches!(self.status, QueryStatus::Success | QueryStatus::Error)
    }
}

/// Per-entry state machine: `pending -> success` or `pending -> error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    Pending,
    Success,
    Error,
}

/// Normalized result shape for a successful query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryValue {
    /// Result kind, e.g. `table` or `list`.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub values: Vec<serde_json::Value>,
    /// Column types, present only for tabular results.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_types: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&QueryStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&QueryStatus::Success).unwrap(),
            "\"success\""
        );
    }

    #[test]
    fn pending_entry_omits_empty_fields() {
        let entry = QueryEntry::pending("LIST tags", Utc::now());
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["query"], "LIST tags");
        assert_eq!(json["status"], "pending");
        assert!(json.get("result").is_none());
        assert!(json.get("error").is_none());
    }

    #[test]
    fn control_entries_have_no_query_text() {
        let entry = QueryEntry::control(Utc::now());
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("query").is_none());
    }

    #[test]
    fn document_defaults_to_unavailable_engine() {
        let doc = BridgeDocument::default();
        assert_eq!(doc.version, BRIDGE_VERSION);
        assert!(!doc.external_engine_available);
        assert!(doc.queries.is_empty());
    }

    #[test]
    fn document_serializes_camel_case() {
        let json = serde_json::to_value(BridgeDocument::default()).unwrap();
        assert!(json.get("externalEngineAvailable").is_some());
        assert!(json.get("queries").is_some());
    }

    #[test]
    fn result_value_uses_type_key() {
        let value = QueryValue {
            kind: "table".into(),
            headers: vec!["tag".into()],
            values: vec![serde_json::json!(["rust", 2])],
            column_types: Some(vec!["string".into(), "number".into()]),
        };
        let json = serde_json::to_value(&value).unwrap();

        assert_eq!(json["type"], "table");
        assert!(json.get("columnTypes").is_some());
    }

    #[test]
    fn control_id_detection() {
        assert!(is_control(CHECK_ID));
        assert!(is_control("_anything"));
        assert!(!is_control("q1"));
    }
}

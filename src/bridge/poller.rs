//! The query bridge: polls the persisted queue, executes pending queries,
//! and purges expired entries.

use crate::bridge::document::{
    BridgeDocument, CHECK_ID, QueryEntry, QueryStatus, is_control,
};
use crate::bridge::engine::QueryEngine;
use crate::infra::{JsonStore, StorageError};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;
use tracing::{debug, info};

/// Entries older than this are purged on the next poll cycle, unless still
/// pending.
const ENTRY_TTL_HOURS: i64 = 24;

/// Fixed message recorded when the engine is unavailable.
pub const ENGINE_UNAVAILABLE: &str = "query engine not available";

/// Errors during bridge operations.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Result type for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// What one poll cycle did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollOutcome {
    /// Pending queries transitioned to success.
    pub succeeded: usize,
    /// Pending queries transitioned to error.
    pub failed: usize,
    /// Expired entries removed.
    pub purged: usize,
    /// Whether this cycle handled an availability probe instead of queries.
    pub checked: bool,
}

/// Owner of the persisted bridge document.
///
/// Deliberately stateless across cycles beyond what is in the file: the file
/// is the queue. An internal mutex serializes read-modify-write cycles so
/// in-process submitters cannot interleave with the poll loop.
#[derive(Debug)]
pub struct QueryBridge {
    storage: JsonStore<BridgeDocument>,
    lock: Mutex<()>,
}

impl QueryBridge {
    /// Opens the bridge, initializing an empty document if the file is
    /// absent.
    ///
    /// # Errors
    ///
    /// Surfaces `StorageError::Corrupt` for an unparseable file.
    pub fn open(path: impl AsRef<Path>) -> BridgeResult<Self> {
        let storage = JsonStore::new(path.as_ref());
        storage.read_or_init()?;
        Ok(Self {
            storage,
            lock: Mutex::new(()),
        })
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    /// Runs one poll cycle at the current time.
    pub fn poll_once(&self, engine: &dyn QueryEngine) -> BridgeResult<PollOutcome> {
        self.poll_at(engine, Utc::now())
    }

    /// Runs one poll cycle with an explicit clock, used by tests.
    ///
    /// Cycle order: handle a pending `_check` probe (one control action per
    /// cycle, short-circuiting query processing); otherwise execute or fail
    /// every pending query; then purge expired non-pending entries; persist
    /// once if anything changed.
    pub fn poll_at(
        &self,
        engine: &dyn QueryEngine,
        now: DateTime<Utc>,
    ) -> BridgeResult<PollOutcome> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.storage.read_or_init()?;
        let mut outcome = PollOutcome::default();

        // Availability probe: one-shot, deleted rather than transitioned.
        if doc
            .queries
            .get(CHECK_ID)
            .is_some_and(|e| e.status == QueryStatus::Pending)
        {
            let available = engine.available();
            doc.external_engine_available = available;
            doc.last_checked = Some(now);
            doc.queries.remove(CHECK_ID);
            self.storage.write(&doc)?;
            info!(available, "availability probe");
            outcome.checked = true;
            return Ok(outcome);
        }

        let pending: Vec<String> = doc
            .queries
            .iter()
            .filter(|(id, e)| !is_control(id) && e.status == QueryStatus::Pending)
            .map(|(id, _)| id.clone())
            .collect();

        let mut dirty = false;

        if !pending.is_empty() {
            let available = engine.available();
            doc.external_engine_available = available;
            doc.last_checked = Some(now);

            for id in pending {
                let Some(entry) = doc.queries.get_mut(&id) else {
                    continue;
                };
                if !available {
                    entry.status = QueryStatus::Error;
                    entry.error = Some(ENGINE_UNAVAILABLE.to_string());
                    entry.result = None;
                    entry.timestamp = now;
                    outcome.failed += 1;
                    continue;
                }

                let query = entry.query.clone().unwrap_or_default();
                debug!(id = %id, query = %query, "executing query");
                match engine.execute(&query) {
                    Ok(value) => {
                        entry.status = QueryStatus::Success;
                        entry.result = Some(value);
                        entry.error = None;
                        outcome.succeeded += 1;
                    }
                    Err(e) => {
                        entry.status = QueryStatus::Error;
                        entry.error = Some(e.0);
                        entry.result = None;
                        outcome.failed += 1;
                    }
                }
                entry.timestamp = now;
            }
            dirty = true;
        }

        outcome.purged = purge_expired(&mut doc, now);
        dirty |= outcome.purged > 0;

        if dirty {
            self.storage.write(&doc)?;
        }

        Ok(outcome)
    }

    /// Runs poll cycles forever at a fixed period.
    pub fn run(
        &self,
        engine: &dyn QueryEngine,
        interval: std::time::Duration,
    ) -> BridgeResult<()> {
        loop {
            let outcome = self.poll_once(engine)?;
            if outcome.succeeded + outcome.failed + outcome.purged > 0 || outcome.checked {
                debug!(?outcome, "poll cycle");
            }
            std::thread::sleep(interval);
        }
    }

    /// Submits a query, returning its caller-visible request id.
    ///
    /// The id is a 16-hex-digit digest of the query text and submission
    /// time, matching what downstream clients generate.
    pub fn submit(&self, query: &str) -> BridgeResult<String> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let now = Utc::now();
        let id = request_id(query, now);

        let mut doc = self.storage.read_or_init()?;
        doc.queries
            .insert(id.clone(), QueryEntry::pending(query, now));
        self.storage.write(&doc)?;

        Ok(id)
    }

    /// Writes a pending `_check` control entry requesting an availability
    /// probe on the next poll cycle.
    pub fn submit_check(&self) -> BridgeResult<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.storage.read_or_init()?;
        doc.queries
            .insert(CHECK_ID.to_string(), QueryEntry::control(Utc::now()));
        self.storage.write(&doc)?;
        Ok(())
    }

    /// Reads the current state of one entry.
    pub fn fetch(&self, id: &str) -> BridgeResult<Option<QueryEntry>> {
        let doc = self.storage.read_or_init()?;
        Ok(doc.queries.get(id).cloned())
    }

    /// Polls an entry until it reaches a terminal state or the timeout
    /// elapses. Returns `None` on timeout, leaving the entry in place.
    pub fn wait(
        &self,
        id: &str,
        timeout: std::time::Duration,
        interval: std::time::Duration,
    ) -> BridgeResult<Option<QueryEntry>> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            if let Some(entry) = self.fetch(id)? {
                if entry.is_terminal() {
                    return Ok(Some(entry));
                }
            }
            if std::time::Instant::now() >= deadline {
                return Ok(None);
            }
            std::thread::sleep(interval);
        }
    }

    /// Returns the persisted availability flag and when it was last checked.
    pub fn availability(&self) -> BridgeResult<(bool, Option<DateTime<Utc>>)> {
        let doc = self.storage.read_or_init()?;
        Ok((doc.external_engine_available, doc.last_checked))
    }

    /// Returns all non-control entries.
    pub fn entries(&self) -> BridgeResult<Vec<(String, QueryEntry)>> {
        let doc = self.storage.read_or_init()?;
        Ok(doc
            .queries
            .into_iter()
            .filter(|(id, _)| !is_control(id))
            .collect())
    }

    /// Removes every non-control entry, returning how many were cleared.
    pub fn clear(&self) -> BridgeResult<usize> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut doc = self.storage.read_or_init()?;
        let before = doc.queries.len();
        doc.queries.retain(|id, _| is_control(id));
        let cleared = before - doc.queries.len();
        if cleared > 0 {
            self.storage.write(&doc)?;
        }
        Ok(cleared)
    }
}

/// Removes non-control entries older than the TTL. Pending entries are
/// never purged.
fn purge_expired(doc: &mut BridgeDocument, now: DateTime<Utc>) -> usize {
    let ttl = Duration::hours(ENTRY_TTL_HOURS);
    let before = doc.queries.len();
    doc.queries.retain(|id, entry| {
        is_control(id) || entry.status == QueryStatus::Pending || now - entry.timestamp <= ttl
    });
    before - doc.queries.len()
}

fn request_id(query: &str, now: DateTime<Utc>) -> String {
    let input = format!("{query}_{}", now.timestamp_nanos_opt().unwrap_or_default());
    let digest = Sha256::digest(input.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    hex[..16].to_string()
}

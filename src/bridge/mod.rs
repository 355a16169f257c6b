//! The query bridge: asynchronous query request/response over a shared
//! persisted document.
//!
//! Callers submit queries by writing pending entries; a fixed-interval poll
//! loop executes them against the external query engine and writes results
//! back. Entries expire after 24 hours. The persisted file is the entire
//! queue; nothing is held in memory between cycles.

pub mod document;
pub mod engine;
pub mod poller;

pub use document::{
    BRIDGE_VERSION, BridgeDocument, CHECK_ID, QueryEntry, QueryStatus, QueryValue, is_control,
};
pub use engine::{EngineError, IndexEngine, QueryEngine};
pub use poller::{BridgeError, BridgeResult, ENGINE_UNAVAILABLE, PollOutcome, QueryBridge};

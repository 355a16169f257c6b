//! Domain types: document records and change events.

pub mod event;
pub mod record;

pub use event::{EventKind, VaultEvent};
pub use record::{CodeBlockTally, DocumentRecord, Heading, TaskEntry};

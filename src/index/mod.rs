//! The index engine: per-document records plus derived vault aggregates.

pub mod aggregate;
pub mod builder;
pub mod document;
pub mod store;

pub use aggregate::{Aggregates, recompute};
pub use builder::{BuildError, BuildResult, FileResult, IndexBuilder, NoopReporter, ProgressReporter};
pub use document::{IndexDocument, LinkEntry, ROOT_FOLDER, VaultStats};
pub use store::{IndexError, IndexResult, IndexStore};

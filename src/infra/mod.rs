//! Infrastructure: persistence of whole-document JSON files.

pub mod storage;

pub use storage::{JsonStore, StorageError, StorageResult};

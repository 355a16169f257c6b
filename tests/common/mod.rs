//! Shared test infrastructure.

pub mod harness;

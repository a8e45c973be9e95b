//! Nullable infrastructure for deterministic testing.
//!
//! The registry's only outward collaborator is its notification sink. This
//! crate provides test-friendly sinks that:
//! - Never block or perform I/O
//! - Can be inspected programmatically
//!
//! Usage: hand a nullable to `Registry::with_sink` in tests.

pub mod sink;

pub use sink::{NullSink, RecordingSink};

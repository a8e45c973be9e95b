//! Shared utilities for the attest workspace.

pub mod logging;

pub use logging::{init_tracing, LogFormat};

//! JSON Lines command logs.
//!
//! One [`Envelope`] per line. Blank lines and lines starting with `#` are
//! skipped.

use attest_registry::Envelope;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("command log line {line}: {source}")]
pub struct CommandLogError {
    /// One-based line number.
    pub line: usize,
    #[source]
    pub source: serde_json::Error,
}

pub fn parse_command_log(text: &str) -> Result<Vec<Envelope>, CommandLogError> {
    let mut envelopes = Vec::new();
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let envelope = serde_json::from_str(line).map_err(|source| CommandLogError {
            line: i + 1,
            source,
        })?;
        envelopes.push(envelope);
    }
    Ok(envelopes)
}

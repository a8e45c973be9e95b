//! Caller identity as seen by the registry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The identity presented with every mutating call.
///
/// The registry only compares principals; it never authenticates them. The
/// empty principal is the null identity returned for absent records.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The null identity.
    pub fn null() -> Self {
        Self(String::new())
    }

    pub fn is_null(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the raw principal string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "<null>")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_principal_is_null() {
        assert!(Principal::default().is_null());
        assert_eq!(Principal::default(), Principal::null());
    }

    #[test]
    fn null_displays_placeholder() {
        assert_eq!(Principal::null().to_string(), "<null>");
        assert_eq!(Principal::new("alice").to_string(), "alice");
    }
}

//! Sequential identifiers for registry entities.
//!
//! Identifiers start at 1 and are never reused. The value 0 is reserved as the
//! "never allocated" sentinel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a submitted item.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(u64);

impl ItemId {
    /// The first identifier handed out by a fresh registry.
    pub const FIRST: Self = Self(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The identifier allocated after this one.
    ///
    /// Registries allocate densely from `FIRST` and restore only dense
    /// snapshots, so the counter stays bounded by the number of live records.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// Identifier of a registered reviewer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewerId(u64);

impl ReviewerId {
    /// The first identifier handed out by a fresh registry.
    pub const FIRST: Self = Self(1);

    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// The identifier allocated after this one.
    ///
    /// Registries allocate densely from `FIRST` and restore only dense
    /// snapshots, so the counter stays bounded by the number of live records.
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ReviewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reviewer#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_ids_start_at_one() {
        assert_eq!(ItemId::FIRST.raw(), 1);
        assert_eq!(ReviewerId::FIRST.raw(), 1);
    }

    #[test]
    fn default_is_the_unallocated_sentinel() {
        assert_eq!(ItemId::default().raw(), 0);
        assert_eq!(ReviewerId::default().raw(), 0);
    }

    #[test]
    fn next_increments_by_one() {
        assert_eq!(ItemId::new(7).next(), ItemId::new(8));
        assert_eq!(ReviewerId::FIRST.next().raw(), 2);
    }

    #[test]
    fn display_names_the_entity() {
        assert_eq!(ItemId::new(3).to_string(), "item#3");
        assert_eq!(ReviewerId::new(4).to_string(), "reviewer#4");
    }
}

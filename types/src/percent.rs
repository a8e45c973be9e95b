//! Bounded percentage values.
//!
//! Every percentage-like field in the registry is stored as a [`Percentage`],
//! so a value outside `[0, 100]` cannot exist once constructed.

use crate::error::RangeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An integer percentage in `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Percentage(u8);

impl Percentage {
    pub const ZERO: Self = Self(0);
    pub const MAX: Self = Self(100);

    /// Construct a percentage in `[0, 100]`.
    pub fn new(value: u32) -> Result<Self, RangeError> {
        Self::checked("percentage", value, 0)
    }

    /// Construct a percentage in `[min, 100]`, naming `field` in the error.
    pub fn checked(field: &'static str, value: u32, min: u8) -> Result<Self, RangeError> {
        if value < u32::from(min) || value > u32::from(Self::MAX.0) {
            return Err(RangeError {
                field,
                value: u64::from(value),
                min: u64::from(min),
                max: u64::from(Self::MAX.0),
            });
        }
        Ok(Self(value as u8))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Percentage {
    type Error = RangeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(u32::from(value))
    }
}

impl From<Percentage> for u8 {
    fn from(p: Percentage) -> Self {
        p.0
    }
}

impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

//! Fundamental types for the attest registry.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! entity identifiers, caller principals, opaque caller-held values, and
//! bounded percentages.

pub mod error;
pub mod ids;
pub mod opaque;
pub mod percent;
pub mod principal;

pub use error::RangeError;
pub use ids::{ItemId, ReviewerId};
pub use opaque::OpaqueValue;
pub use percent::Percentage;
pub use principal::Principal;

//! Threshold attestation registry.
//!
//! Owners submit items, credentialed reviewers score them, and a single fixed
//! administrator finalizes an item once a quorum of distinct reviewers exists:
//! 1. **Submission / registration**: anyone may submit an item or register a reviewer identity.
//! 2. **Verification**: the administrator marks reviewers as verified (one-way).
//! 3. **Review**: a verified reviewer, acting as its owning principal, records one review per item.
//! 4. **Finalization**: the administrator closes the item with an externally computed outcome.
//!
//! Every operation validates completely before mutating anything, so a rejected
//! call leaves the registry untouched. The registry itself does not log; it
//! reports each accepted transition to an [`EventSink`].

pub mod command;
pub mod error;
pub mod event;
pub mod query;
pub mod registry;
pub mod shared;
pub mod snapshot;
pub mod state;

pub use command::{replay, Applied, Command, Envelope, Rejection, ReplayReport};
pub use error::{ConflictReason, Entity, ErrorKind, RegistryError, UnauthorizedReason};
pub use event::{EventBus, EventSink, RegistryEvent};
pub use registry::{Registry, QUORUM};
pub use shared::SharedRegistry;
pub use snapshot::{RegistrySnapshot, ReviewEntry, SNAPSHOT_VERSION};
pub use state::{Item, ReviewScores, Reviewer};

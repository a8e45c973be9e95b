//! Serializable commands and sequential log replay.
//!
//! A command log is the registry's operations written down in order. Replaying
//! the same log against a fresh registry with the same administrator always
//! yields the same state.

use crate::error::RegistryError;
use crate::registry::Registry;
use attest_types::{ItemId, OpaqueValue, Principal, ReviewerId};
use serde::{Deserialize, Serialize};

/// One mutating registry operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Command {
    Submit {
        metadata: OpaqueValue,
        condition: u32,
        required_threshold_pct: u32,
    },
    Register {
        credential: OpaqueValue,
    },
    Verify {
        reviewer: ReviewerId,
    },
    UpdateSuccessRate {
        reviewer: ReviewerId,
        rate: u32,
    },
    RecordReview {
        item: ItemId,
        reviewer: ReviewerId,
        authenticity_score: u32,
        confidence_score: u32,
    },
    Finalize {
        item: ItemId,
        outcome: bool,
        final_score: i64,
    },
}

/// A command together with the principal presenting it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub caller: Principal,
    pub command: Command,
}

/// What an accepted command produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Applied {
    Item(ItemId),
    Reviewer(ReviewerId),
    Unit,
}

/// A log entry the registry refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rejection {
    /// Zero-based position in the replayed log.
    pub index: usize,
    pub envelope: Envelope,
    pub error: RegistryError,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub accepted: usize,
    pub rejected: Vec<Rejection>,
}

impl ReplayReport {
    pub fn total(&self) -> usize {
        self.accepted + self.rejected.len()
    }
}

impl Registry {
    /// Dispatch one envelope to the matching operation.
    pub fn apply(&mut self, envelope: &Envelope) -> Result<Applied, RegistryError> {
        let caller = &envelope.caller;
        match &envelope.command {
            Command::Submit {
                metadata,
                condition,
                required_threshold_pct,
            } => self
                .submit(
                    caller.clone(),
                    metadata.clone(),
                    *condition,
                    *required_threshold_pct,
                )
                .map(Applied::Item),
            Command::Register { credential } => self
                .register(caller.clone(), credential.clone())
                .map(Applied::Reviewer),
            Command::Verify { reviewer } => self.verify(caller, *reviewer).map(|()| Applied::Unit),
            Command::UpdateSuccessRate { reviewer, rate } => self
                .update_success_rate(caller, *reviewer, *rate)
                .map(|()| Applied::Unit),
            Command::RecordReview {
                item,
                reviewer,
                authenticity_score,
                confidence_score,
            } => self
                .record_review(
                    caller,
                    *item,
                    *reviewer,
                    *authenticity_score,
                    *confidence_score,
                )
                .map(|()| Applied::Unit),
            Command::Finalize {
                item,
                outcome,
                final_score,
            } => self
                .finalize(caller, *item, *outcome, *final_score)
                .map(|()| Applied::Unit),
        }
    }
}

/// Apply `envelopes` in order. Rejected entries are recorded and skipped.
pub fn replay<'a>(
    registry: &mut Registry,
    envelopes: impl IntoIterator<Item = &'a Envelope>,
) -> ReplayReport {
    let mut report = ReplayReport::default();
    for (index, envelope) in envelopes.into_iter().enumerate() {
        match registry.apply(envelope) {
            Ok(_) => report.accepted += 1,
            Err(error) => report.rejected.push(Rejection {
                index,
                envelope: envelope.clone(),
                error,
            }),
        }
    }
    report
}

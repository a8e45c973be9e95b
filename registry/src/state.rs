//! Registry entity records.
//!
//! Absent records are represented by the `Default` value of each type: a null
//! principal, zero identifier, and `submitted == false` for items.

use attest_types::{ItemId, OpaqueValue, Percentage, Principal, ReviewerId};
use serde::{Deserialize, Serialize};

/// A submission awaiting attestation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    /// The principal that submitted the item.
    pub submitter: Principal,
    /// Caller-held metadata, stored verbatim.
    pub metadata: OpaqueValue,
    /// Range-checked to `[0, 100]` at submission rather than kept opaque.
    pub condition: Percentage,
    /// True from creation onward; false only on the default record.
    pub submitted: bool,
    pub finalized: bool,
    /// Number of distinct reviewers that reviewed this item.
    pub review_count: u32,
    /// Agreement percentage the finalizing authority is expected to apply.
    /// Stored and exposed, never evaluated here.
    pub required_threshold_pct: Percentage,
    /// Set by finalization.
    pub outcome: Option<bool>,
    /// Set by finalization.
    pub final_score: Option<i64>,
}

/// A credentialed evaluating party.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reviewer {
    pub id: ReviewerId,
    /// The only principal allowed to act as this reviewer.
    pub owner: Principal,
    pub credential: OpaqueValue,
    pub verified: bool,
    /// Accepted reviews across all items.
    pub completed_count: u32,
    /// Administrator-maintained metric, not derived from reviews.
    pub success_rate: Percentage,
}

/// The scores attached to one `(item, reviewer)` review.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewScores {
    pub authenticity: Percentage,
    pub confidence: Percentage,
}

impl Item {
    pub(crate) fn new(
        id: ItemId,
        submitter: Principal,
        metadata: OpaqueValue,
        condition: Percentage,
        required_threshold_pct: Percentage,
    ) -> Self {
        Self {
            id,
            submitter,
            metadata,
            condition,
            submitted: true,
            finalized: false,
            review_count: 0,
            required_threshold_pct,
            outcome: None,
            final_score: None,
        }
    }
}

impl Reviewer {
    pub(crate) fn new(id: ReviewerId, owner: Principal, credential: OpaqueValue) -> Self {
        Self {
            id,
            owner,
            credential,
            verified: false,
            completed_count: 0,
            success_rate: Percentage::ZERO,
        }
    }
}

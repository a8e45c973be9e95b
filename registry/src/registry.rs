//! The registry state machine.
//!
//! All mutators take `&mut self`, run every check before touching any field,
//! and emit exactly one notification once the transition is applied.

use crate::error::{ConflictReason, Entity, RegistryError, UnauthorizedReason};
use crate::event::{EventBus, EventSink, RegistryEvent};
use crate::state::{Item, ReviewScores, Reviewer};
use attest_types::{ItemId, OpaqueValue, Percentage, Principal, ReviewerId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// Distinct reviews required before an item can be finalized.
pub const QUORUM: u32 = 3;

/// Lowest accepted `required_threshold_pct` (a strict majority).
pub const MIN_THRESHOLD_PCT: u8 = 51;

pub struct Registry {
    pub(crate) admin: Principal,
    pub(crate) items: BTreeMap<ItemId, Item>,
    pub(crate) reviewers: BTreeMap<ReviewerId, Reviewer>,
    /// `(item, reviewer)` membership; the source of truth for "already reviewed".
    pub(crate) reviews: HashMap<(ItemId, ReviewerId), ReviewScores>,
    /// Reviewers of each item in the order their reviews were accepted.
    pub(crate) item_reviewers: HashMap<ItemId, Vec<ReviewerId>>,
    pub(crate) next_item_id: ItemId,
    pub(crate) next_reviewer_id: ReviewerId,
    pub(crate) sink: Arc<dyn EventSink>,
}

impl Registry {
    /// Create an empty registry whose notifications go nowhere.
    pub fn new(admin: Principal) -> Result<Self, RegistryError> {
        Self::with_sink(admin, Arc::new(EventBus::new()))
    }

    /// Create an empty registry reporting to `sink`.
    ///
    /// The administrator is fixed for the lifetime of the registry and may not
    /// be the null principal.
    pub fn with_sink(admin: Principal, sink: Arc<dyn EventSink>) -> Result<Self, RegistryError> {
        ensure_not_null(&admin)?;
        Ok(Self {
            admin,
            items: BTreeMap::new(),
            reviewers: BTreeMap::new(),
            reviews: HashMap::new(),
            item_reviewers: HashMap::new(),
            next_item_id: ItemId::FIRST,
            next_reviewer_id: ReviewerId::FIRST,
            sink,
        })
    }

    /// Submit a new item on behalf of `submitter`.
    ///
    /// `condition` must be in `[0, 100]` and `required_threshold_pct` in
    /// `[51, 100]`. A rejected submission does not consume an id.
    pub fn submit(
        &mut self,
        submitter: Principal,
        metadata: OpaqueValue,
        condition: u32,
        required_threshold_pct: u32,
    ) -> Result<ItemId, RegistryError> {
        ensure_not_null(&submitter)?;
        let condition = Percentage::checked("condition", condition, 0)?;
        let threshold = Percentage::checked(
            "required_threshold_pct",
            required_threshold_pct,
            MIN_THRESHOLD_PCT,
        )?;

        let id = self.next_item_id;
        self.items.insert(
            id,
            Item::new(id, submitter.clone(), metadata, condition, threshold),
        );
        self.next_item_id = id.next();

        self.sink.emit(&RegistryEvent::ItemSubmitted {
            item: id,
            submitter,
        });
        Ok(id)
    }

    /// Register a new reviewer identity owned by `owner`.
    ///
    /// The same principal may register any number of times; each call yields
    /// an independent reviewer. The null principal is refused: a reviewer
    /// owned by it would read back exactly like an absent one.
    pub fn register(
        &mut self,
        owner: Principal,
        credential: OpaqueValue,
    ) -> Result<ReviewerId, RegistryError> {
        ensure_not_null(&owner)?;
        let id = self.next_reviewer_id;
        self.reviewers
            .insert(id, Reviewer::new(id, owner.clone(), credential));
        self.next_reviewer_id = id.next();

        self.sink.emit(&RegistryEvent::ReviewerRegistered {
            reviewer: id,
            owner,
        });
        Ok(id)
    }

    /// Mark a reviewer as verified. Idempotent.
    pub fn verify(&mut self, caller: &Principal, reviewer: ReviewerId) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        let record = self
            .reviewers
            .get_mut(&reviewer)
            .ok_or(RegistryError::NotFound(Entity::Reviewer(reviewer)))?;

        record.verified = true;

        let owner = record.owner.clone();
        self.sink
            .emit(&RegistryEvent::ReviewerVerified { reviewer, owner });
        Ok(())
    }

    /// Overwrite a reviewer's success rate.
    pub fn update_success_rate(
        &mut self,
        caller: &Principal,
        reviewer: ReviewerId,
        rate: u32,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        let record = self
            .reviewers
            .get_mut(&reviewer)
            .ok_or(RegistryError::NotFound(Entity::Reviewer(reviewer)))?;
        let rate = Percentage::checked("success_rate", rate, 0)?;

        record.success_rate = rate;

        self.sink
            .emit(&RegistryEvent::SuccessRateUpdated { reviewer, rate });
        Ok(())
    }

    /// Record `reviewer`'s review of `item`.
    ///
    /// Checks run in a fixed order and the first failure wins: item exists,
    /// caller may act as a verified reviewer, scores are in range, the pair
    /// has not reviewed before. On success the item and the reviewer are
    /// updated together.
    pub fn record_review(
        &mut self,
        caller: &Principal,
        item_id: ItemId,
        reviewer_id: ReviewerId,
        authenticity_score: u32,
        confidence_score: u32,
    ) -> Result<(), RegistryError> {
        let item = self
            .items
            .get_mut(&item_id)
            .ok_or(RegistryError::NotFound(Entity::Item(item_id)))?;

        let reviewer = self.reviewers.get_mut(&reviewer_id).ok_or(
            RegistryError::Unauthorized(UnauthorizedReason::UnknownReviewer(reviewer_id)),
        )?;
        if !reviewer.verified {
            return Err(RegistryError::Unauthorized(
                UnauthorizedReason::ReviewerNotVerified(reviewer_id),
            ));
        }
        if &reviewer.owner != caller {
            return Err(RegistryError::Unauthorized(
                UnauthorizedReason::WrongIdentity {
                    reviewer: reviewer_id,
                    caller: caller.clone(),
                },
            ));
        }

        let scores = ReviewScores {
            authenticity: Percentage::checked("authenticity_score", authenticity_score, 0)?,
            confidence: Percentage::checked("confidence_score", confidence_score, 0)?,
        };

        let key = (item_id, reviewer_id);
        if self.reviews.contains_key(&key) {
            return Err(RegistryError::Conflict(ConflictReason::AlreadyReviewed {
                item: item_id,
                reviewer: reviewer_id,
            }));
        }

        self.reviews.insert(key, scores);
        self.item_reviewers
            .entry(item_id)
            .or_default()
            .push(reviewer_id);
        item.review_count += 1;
        reviewer.completed_count += 1;

        self.sink.emit(&RegistryEvent::ReviewRecorded {
            item: item_id,
            reviewer: reviewer_id,
        });
        Ok(())
    }

    /// Close an item with an externally computed outcome.
    ///
    /// The outcome and score are taken as given: they are not checked against
    /// the recorded review scores or the item's threshold.
    pub fn finalize(
        &mut self,
        caller: &Principal,
        item_id: ItemId,
        outcome: bool,
        final_score: i64,
    ) -> Result<(), RegistryError> {
        self.ensure_admin(caller)?;
        let item = self
            .items
            .get_mut(&item_id)
            .ok_or(RegistryError::NotFound(Entity::Item(item_id)))?;
        if item.review_count < QUORUM {
            return Err(RegistryError::InsufficientQuorum {
                item: item_id,
                have: item.review_count,
                need: QUORUM,
            });
        }
        if item.finalized {
            return Err(RegistryError::Conflict(ConflictReason::AlreadyFinalized(
                item_id,
            )));
        }

        item.finalized = true;
        item.outcome = Some(outcome);
        item.final_score = Some(final_score);

        self.sink.emit(&RegistryEvent::ItemFinalized {
            item: item_id,
            outcome,
            final_score,
        });
        Ok(())
    }

    fn ensure_admin(&self, caller: &Principal) -> Result<(), RegistryError> {
        if caller != &self.admin {
            return Err(RegistryError::Unauthorized(
                UnauthorizedReason::NotAdministrator {
                    caller: caller.clone(),
                },
            ));
        }
        Ok(())
    }
}

/// The empty principal is what absent records report; it never owns anything.
fn ensure_not_null(principal: &Principal) -> Result<(), RegistryError> {
    if principal.is_null() {
        return Err(RegistryError::Unauthorized(UnauthorizedReason::NullPrincipal));
    }
    Ok(())
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("admin", &self.admin)
            .field("items", &self.items.len())
            .field("reviewers", &self.reviewers.len())
            .field("reviews", &self.reviews.len())
            .field("next_item_id", &self.next_item_id)
            .field("next_reviewer_id", &self.next_reviewer_id)
            .finish_non_exhaustive()
    }
}

//! Thread-safe handle serializing every operation through one lock.
//!
//! Mutations hold the write lock from the first check to the emitted
//! notification; reads hold the read lock, so they only ever observe states
//! between whole operations.

use crate::command::{Applied, Envelope};
use crate::error::RegistryError;
use crate::event::EventSink;
use crate::registry::Registry;
use crate::snapshot::RegistrySnapshot;
use crate::state::{Item, ReviewScores, Reviewer};
use attest_types::{ItemId, OpaqueValue, Principal, ReviewerId};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Cloneable shared registry. Clones refer to the same state.
#[derive(Clone, Debug)]
pub struct SharedRegistry {
    inner: Arc<RwLock<Registry>>,
}

impl SharedRegistry {
    pub fn new(registry: Registry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Rebuild from a snapshot; see [`Registry::restore`].
    pub fn restore(
        snapshot: RegistrySnapshot,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, RegistryError> {
        Registry::restore(snapshot, sink).map(Self::new)
    }

    // A poisoned lock still guards a consistent registry: every operation
    // validates before it mutates.
    fn write(&self) -> RwLockWriteGuard<'_, Registry> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read(&self) -> RwLockReadGuard<'_, Registry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn submit(
        &self,
        submitter: Principal,
        metadata: OpaqueValue,
        condition: u32,
        required_threshold_pct: u32,
    ) -> Result<ItemId, RegistryError> {
        self.write()
            .submit(submitter, metadata, condition, required_threshold_pct)
    }

    pub fn register(
        &self,
        owner: Principal,
        credential: OpaqueValue,
    ) -> Result<ReviewerId, RegistryError> {
        self.write().register(owner, credential)
    }

    pub fn verify(&self, caller: &Principal, reviewer: ReviewerId) -> Result<(), RegistryError> {
        self.write().verify(caller, reviewer)
    }

    pub fn update_success_rate(
        &self,
        caller: &Principal,
        reviewer: ReviewerId,
        rate: u32,
    ) -> Result<(), RegistryError> {
        self.write().update_success_rate(caller, reviewer, rate)
    }

    pub fn record_review(
        &self,
        caller: &Principal,
        item: ItemId,
        reviewer: ReviewerId,
        authenticity_score: u32,
        confidence_score: u32,
    ) -> Result<(), RegistryError> {
        self.write()
            .record_review(caller, item, reviewer, authenticity_score, confidence_score)
    }

    pub fn finalize(
        &self,
        caller: &Principal,
        item: ItemId,
        outcome: bool,
        final_score: i64,
    ) -> Result<(), RegistryError> {
        self.write().finalize(caller, item, outcome, final_score)
    }

    pub fn apply(&self, envelope: &Envelope) -> Result<Applied, RegistryError> {
        self.write().apply(envelope)
    }

    pub fn get_item_info(&self, item: ItemId) -> Item {
        self.read().get_item_info(item)
    }

    pub fn get_reviewer_info(&self, reviewer: ReviewerId) -> Reviewer {
        self.read().get_reviewer_info(reviewer)
    }

    pub fn get_item_reviewers(&self, item: ItemId) -> Vec<ReviewerId> {
        self.read().get_item_reviewers(item).to_vec()
    }

    pub fn has_reviewed(&self, item: ItemId, reviewer: ReviewerId) -> bool {
        self.read().has_reviewed(item, reviewer)
    }

    pub fn get_review(&self, item: ItemId, reviewer: ReviewerId) -> Option<ReviewScores> {
        self.read().get_review(item, reviewer)
    }

    pub fn item_count(&self) -> u64 {
        self.read().item_count()
    }

    pub fn reviewer_count(&self) -> u64 {
        self.read().reviewer_count()
    }

    pub fn administrator(&self) -> Principal {
        self.read().administrator().clone()
    }

    pub fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError> {
        self.read().snapshot()
    }

    /// Run `f` against one consistent view of the registry.
    pub fn with_view<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        f(&*self.read())
    }
}

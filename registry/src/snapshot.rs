//! Registry snapshots: capture the whole registry state at a point in time.
//!
//! A snapshot lets a collaborator persist the registry and restore it later
//! instead of replaying the full command log. The hash is computed
//! deterministically from the contents so a tampered or truncated snapshot is
//! rejected on restore.

use crate::error::RegistryError;
use crate::event::EventSink;
use crate::registry::{Registry, MIN_THRESHOLD_PCT, QUORUM};
use crate::state::{Item, ReviewScores, Reviewer};
use attest_types::{ItemId, Principal, ReviewerId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub version: u32,
    pub admin: Principal,
    pub next_item_id: ItemId,
    pub next_reviewer_id: ReviewerId,
    /// Items in ascending id order.
    pub items: Vec<Item>,
    /// Reviewers in ascending id order.
    pub reviewers: Vec<Reviewer>,
    /// Reviews grouped by ascending item id, each group in acceptance order.
    pub reviews: Vec<ReviewEntry>,
    /// Blake2b-256 of every field above.
    pub hash: [u8; 32],
}

/// One `(item, reviewer)` review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewEntry {
    pub item: ItemId,
    pub reviewer: ReviewerId,
    pub scores: ReviewScores,
}

impl RegistrySnapshot {
    /// Compute the Blake2b-256 hash of the snapshot contents.
    fn compute_hash(&self) -> Result<[u8; 32], RegistryError> {
        use blake2::digest::consts::U32;
        use blake2::{Blake2b, Digest};

        let body = bincode::serialize(&(
            self.version,
            &self.admin,
            self.next_item_id,
            self.next_reviewer_id,
            &self.items,
            &self.reviewers,
            &self.reviews,
        ))
        .map_err(|e| RegistryError::Snapshot(e.to_string()))?;

        let mut hasher = Blake2b::<U32>::new();
        hasher.update(&body);
        let mut out = [0u8; 32];
        out.copy_from_slice(&hasher.finalize());
        Ok(out)
    }

    /// Verify the hash matches the contents.
    pub fn verify(&self) -> bool {
        matches!(self.compute_hash(), Ok(hash) if hash == self.hash)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, RegistryError> {
        bincode::serialize(self).map_err(|e| RegistryError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, RegistryError> {
        bincode::deserialize(bytes).map_err(|e| RegistryError::Snapshot(e.to_string()))
    }

    pub fn hash_hex(&self) -> String {
        self.hash.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl Registry {
    /// Capture the current state.
    pub fn snapshot(&self) -> Result<RegistrySnapshot, RegistryError> {
        let mut reviews = Vec::with_capacity(self.reviews.len());
        for item in self.items.keys() {
            for reviewer in self.get_item_reviewers(*item) {
                if let Some(scores) = self.reviews.get(&(*item, *reviewer)) {
                    reviews.push(ReviewEntry {
                        item: *item,
                        reviewer: *reviewer,
                        scores: *scores,
                    });
                }
            }
        }

        let mut snap = RegistrySnapshot {
            version: SNAPSHOT_VERSION,
            admin: self.admin.clone(),
            next_item_id: self.next_item_id,
            next_reviewer_id: self.next_reviewer_id,
            items: self.items.values().cloned().collect(),
            reviewers: self.reviewers.values().cloned().collect(),
            reviews,
            hash: [0u8; 32],
        };
        snap.hash = snap.compute_hash()?;
        Ok(snap)
    }

    /// Rebuild a registry from a snapshot, reporting to `sink`.
    ///
    /// The snapshot must carry a valid hash, a known version, and contents
    /// that satisfy every registry invariant: dense ids with each counter one
    /// past the last record, thresholds of at least 51%, non-null principals
    /// and review counts that match the review pairs. Restoring emits no
    /// notifications.
    pub fn restore(
        snapshot: RegistrySnapshot,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, RegistryError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(RegistryError::Snapshot(format!(
                "unsupported version {}",
                snapshot.version
            )));
        }
        if !snapshot.verify() {
            return Err(RegistryError::Snapshot("hash mismatch".into()));
        }
        if snapshot.next_item_id < ItemId::FIRST || snapshot.next_reviewer_id < ReviewerId::FIRST
        {
            return Err(RegistryError::Snapshot("id counters must start at 1".into()));
        }
        if snapshot.admin.is_null() {
            return Err(invalid("administrator is the null principal".into()));
        }

        let mut items = BTreeMap::new();
        for item in snapshot.items {
            if item.id < ItemId::FIRST || item.id >= snapshot.next_item_id {
                return Err(invalid(format!("{} outside allocated range", item.id)));
            }
            if !item.submitted {
                return Err(invalid(format!("{} is not marked submitted", item.id)));
            }
            if item.submitter.is_null() {
                return Err(invalid(format!("{} has a null submitter", item.id)));
            }
            if item.required_threshold_pct.value() < MIN_THRESHOLD_PCT {
                return Err(invalid(format!(
                    "{} threshold {} below {MIN_THRESHOLD_PCT}%",
                    item.id, item.required_threshold_pct
                )));
            }
            if item.finalized != (item.outcome.is_some() && item.final_score.is_some()) {
                return Err(invalid(format!("{} has inconsistent finalization", item.id)));
            }
            let id = item.id;
            if items.insert(id, item).is_some() {
                return Err(invalid(format!("duplicate {id}")));
            }
        }
        // Records are never deleted, so every id below the counter is taken.
        if items.len() as u64 + 1 != snapshot.next_item_id.raw() {
            return Err(invalid(format!(
                "item counter {} does not follow {} items",
                snapshot.next_item_id.raw(),
                items.len()
            )));
        }

        let mut reviewers = BTreeMap::new();
        for reviewer in snapshot.reviewers {
            if reviewer.id < ReviewerId::FIRST || reviewer.id >= snapshot.next_reviewer_id {
                return Err(invalid(format!("{} outside allocated range", reviewer.id)));
            }
            if reviewer.owner.is_null() {
                return Err(invalid(format!("{} has a null owner", reviewer.id)));
            }
            let id = reviewer.id;
            if reviewers.insert(id, reviewer).is_some() {
                return Err(invalid(format!("duplicate {id}")));
            }
        }
        if reviewers.len() as u64 + 1 != snapshot.next_reviewer_id.raw() {
            return Err(invalid(format!(
                "reviewer counter {} does not follow {} reviewers",
                snapshot.next_reviewer_id.raw(),
                reviewers.len()
            )));
        }

        let mut reviews = HashMap::new();
        let mut item_reviewers: HashMap<ItemId, Vec<ReviewerId>> = HashMap::new();
        let mut completed: HashMap<ReviewerId, u32> = HashMap::new();
        for entry in snapshot.reviews {
            if !items.contains_key(&entry.item) {
                return Err(invalid(format!("review of unknown {}", entry.item)));
            }
            match reviewers.get(&entry.reviewer) {
                Some(r) if r.verified => {}
                Some(_) => {
                    return Err(invalid(format!("review by unverified {}", entry.reviewer)));
                }
                None => return Err(invalid(format!("review by unknown {}", entry.reviewer))),
            }
            if reviews
                .insert((entry.item, entry.reviewer), entry.scores)
                .is_some()
            {
                return Err(invalid(format!(
                    "duplicate review of {} by {}",
                    entry.item, entry.reviewer
                )));
            }
            item_reviewers
                .entry(entry.item)
                .or_default()
                .push(entry.reviewer);
            *completed.entry(entry.reviewer).or_default() += 1;
        }

        for item in items.values() {
            let indexed = item_reviewers.get(&item.id).map_or(0, Vec::len);
            if item.review_count as usize != indexed {
                return Err(invalid(format!(
                    "{} counts {} reviews but has {}",
                    item.id, item.review_count, indexed
                )));
            }
            if item.finalized && item.review_count < QUORUM {
                return Err(invalid(format!("{} finalized without quorum", item.id)));
            }
        }
        for reviewer in reviewers.values() {
            let accepted = completed.get(&reviewer.id).copied().unwrap_or(0);
            if reviewer.completed_count != accepted {
                return Err(invalid(format!(
                    "{} counts {} reviews but has {}",
                    reviewer.id, reviewer.completed_count, accepted
                )));
            }
        }

        Ok(Self {
            admin: snapshot.admin,
            items,
            reviewers,
            reviews,
            item_reviewers,
            next_item_id: snapshot.next_item_id,
            next_reviewer_id: snapshot.next_reviewer_id,
            sink,
        })
    }
}

fn invalid(reason: String) -> RegistryError {
    RegistryError::Snapshot(reason)
}

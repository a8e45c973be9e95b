//! Read accessors.
//!
//! Lookups of absent records never fail: they return the default record
//! (null principal, `submitted == false`) so callers can check existence
//! cheaply.

use crate::registry::Registry;
use crate::state::{Item, ReviewScores, Reviewer};
use attest_types::{ItemId, Principal, ReviewerId};

impl Registry {
    pub fn get_item_info(&self, item: ItemId) -> Item {
        self.items.get(&item).cloned().unwrap_or_default()
    }

    pub fn get_reviewer_info(&self, reviewer: ReviewerId) -> Reviewer {
        self.reviewers.get(&reviewer).cloned().unwrap_or_default()
    }

    /// Reviewers of `item` in acceptance order; empty for unknown items.
    pub fn get_item_reviewers(&self, item: ItemId) -> &[ReviewerId] {
        self.item_reviewers
            .get(&item)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn has_reviewed(&self, item: ItemId, reviewer: ReviewerId) -> bool {
        self.reviews.contains_key(&(item, reviewer))
    }

    pub fn get_review(&self, item: ItemId, reviewer: ReviewerId) -> Option<ReviewScores> {
        self.reviews.get(&(item, reviewer)).copied()
    }

    /// Number of item ids allocated so far.
    pub fn item_count(&self) -> u64 {
        self.next_item_id.raw() - 1
    }

    /// Number of reviewer ids allocated so far.
    pub fn reviewer_count(&self) -> u64 {
        self.next_reviewer_id.raw() - 1
    }

    pub fn administrator(&self) -> &Principal {
        &self.admin
    }

    /// All items in ascending id order.
    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// All reviewers in ascending id order.
    pub fn reviewers(&self) -> impl Iterator<Item = &Reviewer> {
        self.reviewers.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attest_types::OpaqueValue;

    fn admin() -> Principal {
        Principal::new("admin")
    }

    #[test]
    fn absent_records_are_defaults() {
        let reg = Registry::new(admin()).unwrap();
        let item = reg.get_item_info(ItemId::new(7));
        assert!(!item.submitted);
        assert!(item.submitter.is_null());
        let reviewer = reg.get_reviewer_info(ReviewerId::new(7));
        assert!(reviewer.owner.is_null());
        assert!(!reviewer.verified);
        assert!(reg.get_item_reviewers(ItemId::new(7)).is_empty());
    }

    #[test]
    fn counts_track_allocated_ids() {
        let mut reg = Registry::new(admin()).unwrap();
        assert_eq!(reg.item_count(), 0);
        assert_eq!(reg.reviewer_count(), 0);
        reg.submit(Principal::new("o"), OpaqueValue::default(), 1, 51)
            .unwrap();
        reg.register(Principal::new("r"), OpaqueValue::default()).unwrap();
        reg.register(Principal::new("r"), OpaqueValue::default()).unwrap();
        assert_eq!(reg.item_count(), 1);
        assert_eq!(reg.reviewer_count(), 2);
        assert_eq!(reg.items().count(), 1);
        assert_eq!(reg.reviewers().count(), 2);
    }

    #[test]
    fn review_lookups() {
        let mut reg = Registry::new(admin()).unwrap();
        let item = reg
            .submit(Principal::new("o"), OpaqueValue::default(), 1, 51)
            .unwrap();
        let r = reg.register(Principal::new("r"), OpaqueValue::default()).unwrap();
        reg.verify(&admin(), r).unwrap();
        assert!(!reg.has_reviewed(item, r));
        assert_eq!(reg.get_review(item, r), None);

        reg.record_review(&Principal::new("r"), item, r, 40, 90)
            .unwrap();
        assert!(reg.has_reviewed(item, r));
        let scores = reg.get_review(item, r).unwrap();
        assert_eq!(scores.authenticity.value(), 40);
        assert_eq!(scores.confidence.value(), 90);
        assert_eq!(reg.get_item_reviewers(item), &[r]);
    }

    #[test]
    fn administrator_is_fixed_at_construction() {
        let reg = Registry::new(admin()).unwrap();
        assert_eq!(reg.administrator(), &admin());
    }
}

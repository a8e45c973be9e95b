#![no_main]

use libfuzzer_sys::fuzz_target;

use attest_registry::{replay, Envelope, Registry};
use attest_types::{ItemId, Principal, ReviewerId};

// Replay arbitrary JSON command logs and check the registry invariants after
// every run. Replay must never panic regardless of input.
fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let envelopes: Vec<Envelope> = text
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();

    let mut registry = Registry::new(Principal::new("admin")).expect("non-null administrator");
    let report = replay(&mut registry, &envelopes);
    assert_eq!(report.total(), envelopes.len());

    for raw in 1..=registry.item_count() {
        let item = registry.get_item_info(ItemId::new(raw));
        let reviewers = registry.get_item_reviewers(item.id);
        assert!(item.submitted);
        assert_eq!(item.review_count as usize, reviewers.len());
        for reviewer in reviewers {
            assert!(registry.has_reviewed(item.id, *reviewer));
        }
        if item.finalized {
            assert!(item.review_count >= attest_registry::QUORUM);
        }
    }
    for raw in 1..=registry.reviewer_count() {
        let reviewer = registry.get_reviewer_info(ReviewerId::new(raw));
        assert_eq!(reviewer.id.raw(), raw);
    }

    // Whatever state we reached must survive a snapshot round trip.
    let snapshot = registry.snapshot().expect("snapshot of a live registry");
    assert!(snapshot.verify());
});

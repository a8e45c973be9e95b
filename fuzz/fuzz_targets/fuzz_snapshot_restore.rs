#![no_main]

use libfuzzer_sys::fuzz_target;

use std::sync::Arc;

use attest_registry::{EventBus, Registry, RegistrySnapshot};
use attest_types::{OpaqueValue, Principal};

// Decode and restore arbitrary bytes as a snapshot. Malformed input must be
// rejected with an error, never a panic, and any registry that does restore
// must keep allocating fresh ids.
fuzz_target!(|data: &[u8]| {
    let Ok(snapshot) = RegistrySnapshot::from_bytes(data) else {
        return;
    };
    let Ok(mut registry) = Registry::restore(snapshot, Arc::new(EventBus::new())) else {
        return;
    };

    let items = registry.item_count();
    let reviewers = registry.reviewer_count();
    let item = registry
        .submit(Principal::new("fuzz"), OpaqueValue::default(), 50, 75)
        .expect("valid submission");
    let reviewer = registry
        .register(Principal::new("fuzz"), OpaqueValue::default())
        .expect("valid registration");
    assert_eq!(item.raw(), items + 1);
    assert_eq!(reviewer.raw(), reviewers + 1);
    assert!(registry.snapshot().expect("snapshot of a live registry").verify());
});

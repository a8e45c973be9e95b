//! Nullable notification sinks.

use attest_registry::{EventSink, RegistryEvent};
use attest_types::{ItemId, ReviewerId};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Discards every notification.
#[derive(Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &RegistryEvent) {}
}

/// Records every notification in emission order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<RegistryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn guard(&self) -> MutexGuard<'_, Vec<RegistryEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// All notifications recorded so far.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.guard().clone()
    }

    /// Notification names in emission order.
    pub fn names(&self) -> Vec<&'static str> {
        self.guard().iter().map(RegistryEvent::name).collect()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    pub fn last(&self) -> Option<RegistryEvent> {
        self.guard().last().cloned()
    }

    /// Reviewers whose reviews of `item` were reported, in order.
    pub fn reviews_of(&self, item: ItemId) -> Vec<ReviewerId> {
        self.guard()
            .iter()
            .filter_map(|e| match e {
                RegistryEvent::ReviewRecorded { item: i, reviewer } if *i == item => {
                    Some(*reviewer)
                }
                _ => None,
            })
            .collect()
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        self.guard().clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &RegistryEvent) {
        self.guard().push(event.clone());
    }
}

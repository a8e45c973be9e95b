//! Notifications emitted for each accepted registry transition.

use attest_types::{ItemId, Percentage, Principal, ReviewerId};
use serde::Serialize;

/// One notification per accepted mutating operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RegistryEvent {
    ItemSubmitted {
        item: ItemId,
        submitter: Principal,
    },
    ReviewerRegistered {
        reviewer: ReviewerId,
        owner: Principal,
    },
    ReviewerVerified {
        reviewer: ReviewerId,
        owner: Principal,
    },
    SuccessRateUpdated {
        reviewer: ReviewerId,
        rate: Percentage,
    },
    ReviewRecorded {
        item: ItemId,
        reviewer: ReviewerId,
    },
    ItemFinalized {
        item: ItemId,
        outcome: bool,
        final_score: i64,
    },
}

impl RegistryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ItemSubmitted { .. } => "item_submitted",
            Self::ReviewerRegistered { .. } => "reviewer_registered",
            Self::ReviewerVerified { .. } => "reviewer_verified",
            Self::SuccessRateUpdated { .. } => "success_rate_updated",
            Self::ReviewRecorded { .. } => "review_recorded",
            Self::ItemFinalized { .. } => "item_finalized",
        }
    }
}

/// Receiver of registry notifications.
///
/// Called inline while the registry holds exclusive access, after the
/// transition has been applied. Implementations must not call back into the
/// registry.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &RegistryEvent);
}

/// Synchronous fan-out sink.
///
/// Listeners are invoked inline on the emitting thread in subscription order;
/// keep handlers fast.
pub struct EventBus {
    listeners: Vec<Box<dyn Fn(&RegistryEvent) + Send + Sync>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: Box<dyn Fn(&RegistryEvent) + Send + Sync>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl EventSink for EventBus {
    fn emit(&self, event: &RegistryEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    };

    fn submitted() -> RegistryEvent {
        RegistryEvent::ItemSubmitted {
            item: ItemId::FIRST,
            submitter: Principal::new("alice"),
        }
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&submitted());
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn every_listener_sees_every_event() {
        let mut bus = EventBus::new();
        let a = Arc::new(AtomicUsize::new(0));
        let b = Arc::new(AtomicUsize::new(0));
        let a2 = a.clone();
        let b2 = b.clone();
        bus.subscribe(Box::new(move |_| {
            a2.fetch_add(1, Ordering::SeqCst);
        }));
        bus.subscribe(Box::new(move |_| {
            b2.fetch_add(1, Ordering::SeqCst);
        }));

        bus.emit(&submitted());
        bus.emit(&RegistryEvent::ReviewRecorded {
            item: ItemId::FIRST,
            reviewer: ReviewerId::FIRST,
        });

        assert_eq!(a.load(Ordering::SeqCst), 2);
        assert_eq!(b.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn listener_receives_event_fields() {
        let mut bus = EventBus::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        bus.subscribe(Box::new(move |event: &RegistryEvent| {
            seen2.lock().unwrap().push(event.clone());
        }));

        let event = RegistryEvent::ItemFinalized {
            item: ItemId::new(4),
            outcome: true,
            final_score: 80,
        };
        bus.emit(&event);

        assert_eq!(*seen.lock().unwrap(), vec![event]);
    }

    #[test]
    fn json_carries_event_tag() {
        let json = serde_json::to_value(submitted()).unwrap();
        assert_eq!(json["event"], "item_submitted");
        assert_eq!(json["item"], 1);
        assert_eq!(json["submitter"], "alice");
        assert_eq!(submitted().name(), "item_submitted");
    }
}

//! Notification sink that writes every registry notification to the log.

use attest_registry::{EventSink, RegistryEvent};

pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &RegistryEvent) {
        match event {
            RegistryEvent::ItemSubmitted { item, submitter } => {
                tracing::info!(item = item.raw(), %submitter, "item submitted");
            }
            RegistryEvent::ReviewerRegistered { reviewer, owner } => {
                tracing::info!(reviewer = reviewer.raw(), %owner, "reviewer registered");
            }
            RegistryEvent::ReviewerVerified { reviewer, owner } => {
                tracing::info!(reviewer = reviewer.raw(), %owner, "reviewer verified");
            }
            RegistryEvent::SuccessRateUpdated { reviewer, rate } => {
                tracing::info!(reviewer = reviewer.raw(), rate = rate.value(), "success rate updated");
            }
            RegistryEvent::ReviewRecorded { item, reviewer } => {
                tracing::info!(item = item.raw(), reviewer = reviewer.raw(), "review recorded");
            }
            RegistryEvent::ItemFinalized {
                item,
                outcome,
                final_score,
            } => {
                tracing::info!(item = item.raw(), outcome, final_score, "item finalized");
            }
        }
    }
}

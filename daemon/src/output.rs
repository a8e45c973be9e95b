//! JSON rendering of daemon results.

use attest_registry::{Applied, Command, Registry, RegistrySnapshot, ReplayReport};
use serde_json::{json, Value};

fn op_name(command: &Command) -> &'static str {
    match command {
        Command::Submit { .. } => "submit",
        Command::Register { .. } => "register",
        Command::Verify { .. } => "verify",
        Command::UpdateSuccessRate { .. } => "update_success_rate",
        Command::RecordReview { .. } => "record_review",
        Command::Finalize { .. } => "finalize",
    }
}

pub fn replay_report(report: &ReplayReport, registry: &Registry) -> Value {
    let rejected: Vec<Value> = report
        .rejected
        .iter()
        .map(|r| {
            json!({
                "index": r.index,
                "op": op_name(&r.envelope.command),
                "caller": r.envelope.caller,
                "kind": r.error.kind().as_str(),
                "error": r.error.to_string(),
            })
        })
        .collect();
    let items: Vec<Value> = registry.items().map(|item| item_view(registry, item.id)).collect();
    json!({
        "accepted": report.accepted,
        "rejected": rejected,
        "items": items,
    })
}

/// An item together with its ordered reviewer list.
pub fn item_view(registry: &Registry, id: attest_types::ItemId) -> Value {
    json!({
        "item": registry.get_item_info(id),
        "reviewers": registry.get_item_reviewers(id),
    })
}

pub fn snapshot_summary(snapshot: &RegistrySnapshot) -> Value {
    json!({
        "version": snapshot.version,
        "hash": snapshot.hash_hex(),
        "administrator": snapshot.admin,
        "items": snapshot.items.len(),
        "finalized": snapshot.items.iter().filter(|i| i.finalized).count(),
        "reviewers": snapshot.reviewers.len(),
        "verified": snapshot.reviewers.iter().filter(|r| r.verified).count(),
        "reviews": snapshot.reviews.len(),
    })
}

pub fn applied(result: &Applied) -> Value {
    json!(result)
}

use super::types::ChangeKind;

/// Map an action phrase ("will be created", "must be replaced", ...) to a change kind.
///
/// Checks run in priority order on the lowercased phrase; anything unmatched is a no-op.
pub fn classify(action: &str) -> ChangeKind {
    let action = action.to_lowercase();

    if action.contains("created") {
        ChangeKind::Create
    } else if action.contains("updated") || action.contains("modified") {
        ChangeKind::Update
    } else if action.contains("destroyed") {
        ChangeKind::Delete
    } else if action.contains("replaced") {
        ChangeKind::Replace
    } else {
        ChangeKind::NoOp
    }
}

use seonoc_common::error::{NocError, NocResult};
use seonoc_common::types::{ActionType, EntrySnapshot};

const CHANGE_NOTE_MIN: usize = 10;
const CHANGE_NOTE_MAX: usize = 2000;
const REASON_NOTE_MIN: usize = 20;
const RESOLUTION_NOTE_MIN: usize = 10;

/// Mandatory rationale on every graph mutation.
pub fn validate_change_note(note: &str) -> NocResult<()> {
    let trimmed = note.trim();
    if trimmed.len() < CHANGE_NOTE_MIN {
        return Err(NocError::validation(format!(
            "change note must be at least {CHANGE_NOTE_MIN} characters"
        )));
    }
    if trimmed.len() > CHANGE_NOTE_MAX {
        return Err(NocError::validation(format!(
            "change note must be at most {CHANGE_NOTE_MAX} characters"
        )));
    }
    Ok(())
}

/// Optimizations demand a longer rationale.
pub fn validate_reason_note(note: &str) -> NocResult<()> {
    if note.trim().len() < REASON_NOTE_MIN {
        return Err(NocError::validation(format!(
            "reason note must be at least {REASON_NOTE_MIN} characters"
        )));
    }
    Ok(())
}

pub fn validate_resolution_note(note: &str) -> NocResult<()> {
    if note.trim().len() < RESOLUTION_NOTE_MIN {
        return Err(NocError::validation(format!(
            "resolution note must be at least {RESOLUTION_NOTE_MIN} characters"
        )));
    }
    Ok(())
}

/// Names of tracked fields that differ between two entry snapshots.
pub fn diff_snapshots(before: &EntrySnapshot, after: &EntrySnapshot) -> Vec<&'static str> {
    let mut changed = Vec::new();
    if before.domain_role != after.domain_role {
        changed.push("domain_role");
    }
    if before.domain_status != after.domain_status {
        changed.push("domain_status");
    }
    if before.index_status != after.index_status {
        changed.push("index_status");
    }
    if before.optimized_path != after.optimized_path {
        changed.push("optimized_path");
    }
    if before.target_entry_id != after.target_entry_id {
        changed.push("target_entry_id");
    }
    if before.primary_keyword != after.primary_keyword {
        changed.push("primary_keyword");
    }
    if before.ranking_position != after.ranking_position {
        changed.push("ranking_position");
    }
    if before.ranking_url != after.ranking_url {
        changed.push("ranking_url");
    }
    if before.notes != after.notes {
        changed.push("notes");
    }
    changed
}

/// Ledger action derived from the diff: role beats path beats a pure
/// relink; everything else is a plain update.
pub fn classify_action(changed: &[&str]) -> ActionType {
    if changed.contains(&"domain_role") {
        return ActionType::ChangeRole;
    }
    if changed.contains(&"optimized_path") {
        return ActionType::ChangePath;
    }
    if changed == ["target_entry_id"] {
        return ActionType::RelinkNode;
    }
    ActionType::UpdateNode
}

#[cfg(test)]
mod tests {
    use super::*;
    use seonoc_common::types::{DomainRole, IndexStatus, NodeStatus};

    fn snapshot() -> EntrySnapshot {
        EntrySnapshot {
            domain_role: DomainRole::Supporting,
            domain_status: NodeStatus::Canonical,
            index_status: IndexStatus::Index,
            optimized_path: Some("/blog".to_string()),
            target_entry_id: Some("m".to_string()),
            primary_keyword: "kw".to_string(),
            ranking_position: Some(3),
            ranking_url: String::new(),
            notes: String::new(),
        }
    }

    #[test]
    fn short_change_note_rejected() {
        assert!(validate_change_note("fix").is_err());
        assert!(validate_change_note("   fix    ").is_err());
        assert!(validate_change_note("add T1 supporter").is_ok());
    }

    #[test]
    fn oversized_change_note_rejected() {
        let long = "x".repeat(2001);
        assert!(validate_change_note(&long).is_err());
    }

    #[test]
    fn reason_note_needs_twenty_chars() {
        assert!(validate_reason_note("too short").is_err());
        assert!(validate_reason_note("a sufficiently long reason").is_ok());
    }

    #[test]
    fn resolution_note_needs_ten_chars() {
        assert!(validate_resolution_note("done").is_err());
        assert!(validate_resolution_note("structure fixed").is_ok());
    }

    #[test]
    fn identical_snapshots_have_no_diff() {
        assert!(diff_snapshots(&snapshot(), &snapshot()).is_empty());
    }

    #[test]
    fn every_tracked_field_is_diffed() {
        let before = snapshot();
        let mut after = snapshot();
        after.domain_role = DomainRole::Main;
        after.domain_status = NodeStatus::Primary;
        after.index_status = IndexStatus::Noindex;
        after.optimized_path = None;
        after.target_entry_id = None;
        after.primary_keyword = "other".to_string();
        after.ranking_position = None;
        after.ranking_url = "https://x".to_string();
        after.notes = "n".to_string();
        assert_eq!(diff_snapshots(&before, &after).len(), 9);
    }

    #[test]
    fn role_change_wins_classification() {
        let mut after = snapshot();
        after.domain_role = DomainRole::Main;
        after.optimized_path = None;
        let changed = diff_snapshots(&snapshot(), &after);
        assert_eq!(classify_action(&changed), ActionType::ChangeRole);
    }

    #[test]
    fn path_change_beats_update() {
        let mut after = snapshot();
        after.optimized_path = Some("/blog2".to_string());
        after.notes = "moved".to_string();
        let changed = diff_snapshots(&snapshot(), &after);
        assert_eq!(classify_action(&changed), ActionType::ChangePath);
    }

    #[test]
    fn target_only_change_is_relink() {
        let mut after = snapshot();
        after.target_entry_id = Some("other".to_string());
        let changed = diff_snapshots(&snapshot(), &after);
        assert_eq!(classify_action(&changed), ActionType::RelinkNode);
    }

    #[test]
    fn anything_else_is_update() {
        let mut after = snapshot();
        after.primary_keyword = "new kw".to_string();
        let changed = diff_snapshots(&snapshot(), &after);
        assert_eq!(classify_action(&changed), ActionType::UpdateNode);
    }
}

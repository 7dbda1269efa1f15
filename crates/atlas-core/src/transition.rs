//! Status transitions for backlog items.
//!
//! [`plan`] decides what a status change means for an item without touching
//! it; [`apply`] writes that decision onto the record. The store sits between
//! the two and moves the artifact file on disk.

use crate::item::Item;
use crate::paths;
use crate::types::Status;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub old_status: Status,
    pub new_status: Status,
    pub old_file_path: String,
    pub new_file_path: String,
    /// Entering `in_progress` from another status.
    pub starts_work: bool,
    /// Crossing into the done state from a non-done status.
    pub completes: bool,
}

impl Transition {
    pub fn file_renamed(&self) -> bool {
        self.old_file_path != self.new_file_path
    }
}

/// Work out the effects of moving `item` to `target`.
///
/// The artifact file name always ends up agreeing with the target status:
/// marked with a leading underscore when done, unmarked otherwise.
pub fn plan(item: &Item, target: Status) -> Transition {
    let old_status = item.status;
    let new_file_path = if target.is_done() {
        paths::mark_done(&item.file_path)
    } else {
        paths::unmark_done(&item.file_path)
    };
    Transition {
        old_status,
        new_status: target,
        old_file_path: item.file_path.clone(),
        new_file_path,
        starts_work: target == Status::InProgress && old_status != Status::InProgress,
        completes: target.is_done() && !old_status.is_done(),
    }
}

/// Apply a planned transition. Never touches `id`, type or `created_at`.
pub fn apply(item: &mut Item, transition: &Transition, now: DateTime<Utc>) {
    item.status = transition.new_status;
    item.unknown_status = None;
    item.file_path = transition.new_file_path.clone();
    item.updated_at = Some(now);
    if transition.starts_work {
        item.started_at = Some(now);
    }
    if transition.completes {
        item.completed_at = Some(now);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NewItem;
    use crate::types::ItemType;
    use chrono::Duration;

    fn transition(item: &mut Item, target: Status, now: DateTime<Utc>) -> Transition {
        let planned = plan(item, target);
        apply(item, &planned, now);
        planned
    }

    fn feature(file_path: &str) -> Item {
        let created = Utc::now() - Duration::days(2);
        Item::new("F0030", NewItem::new(ItemType::Feature, "Fix login"), file_path, created)
    }

    #[test]
    fn done_round_trip_preserves_slug() {
        let mut item = feature("F0030_fix_login.md");
        let now = Utc::now();

        let t = transition(&mut item, Status::Done, now);
        assert!(t.file_renamed());
        assert!(t.completes);
        assert_eq!(item.file_path, "_F0030_fix_login.md");
        assert_eq!(item.completed_at, Some(now));

        let t = transition(&mut item, Status::InProgress, now);
        assert!(t.file_renamed());
        assert_eq!(item.file_path, "F0030_fix_login.md");
    }

    #[test]
    fn started_at_stamped_once() {
        let mut item = feature("F0030.md");
        let first = Utc::now();
        transition(&mut item, Status::InProgress, first);
        assert_eq!(item.started_at, Some(first));

        let later = first + Duration::minutes(5);
        let t = transition(&mut item, Status::InProgress, later);
        assert!(!t.starts_work);
        assert_eq!(item.started_at, Some(first));
        assert_eq!(item.updated_at, Some(later));
    }

    #[test]
    fn done_to_done_does_not_restamp_completion() {
        let mut item = feature("F0030.md");
        let first = Utc::now();
        transition(&mut item, Status::Done, first);
        let t = transition(&mut item, Status::Done, first + Duration::hours(1));
        assert!(!t.completes);
        assert!(!t.file_renamed());
        assert_eq!(item.completed_at, Some(first));
        assert_eq!(item.file_path, "_F0030.md");
    }

    #[test]
    fn done_status_marks_unmarked_legacy_file() {
        let mut item = feature("features/F0030_fix_login.md");
        item.status = Status::Done;
        let t = plan(&item, Status::Done);
        assert!(t.file_renamed());
        assert!(paths::is_marked_done(&t.new_file_path));
    }

    #[test]
    fn identity_fields_are_preserved() {
        let mut item = feature("F0030.md");
        let before = item.clone();
        for status in Status::all() {
            transition(&mut item, *status, Utc::now());
            assert_eq!(item.id, before.id);
            assert_eq!(item.item_type(), before.item_type());
            assert_eq!(item.created_at, before.created_at);
        }
    }

    #[test]
    fn plan_does_not_mutate() {
        let item = feature("F0030.md");
        let before = item.clone();
        let _ = plan(&item, Status::Blocked);
        assert_eq!(item, before);
    }

    #[test]
    fn transition_replaces_unknown_status() {
        let mut item = feature("F0030.md");
        item.unknown_status = Some("review".to_string());
        transition(&mut item, Status::InReview, Utc::now());
        assert!(item.unknown_status.is_none());
        assert_eq!(item.status_label(), "in_review");
    }
}

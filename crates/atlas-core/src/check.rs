//! Consistency report over the backlog document, its artifacts and config.

use crate::backlog::Backlog;
use crate::config::WarnLevel;
use crate::error::Result;
use crate::paths;
use crate::types::{ItemType, Status};
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Naming,
    DoneMarker,
    MissingFile,
    OrphanFile,
    DuplicateId,
    InvalidStatus,
    InvalidPriority,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueSeverity {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize)]
pub struct Issue {
    pub kind: IssueKind,
    pub severity: IssueSeverity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub ok: bool,
    pub checked: usize,
    pub issues: Vec<Issue>,
}

pub fn check(backlog: &Backlog) -> Result<Report> {
    let mut issues = Vec::new();
    let root = backlog.root();

    for warning in backlog.config().validate() {
        issues.push(Issue {
            kind: IssueKind::Config,
            severity: match warning.level {
                WarnLevel::Error => IssueSeverity::High,
                WarnLevel::Warning => IssueSeverity::Low,
            },
            item_id: None,
            path: Some(paths::CONFIG_FILE.to_string()),
            message: warning.message,
        });
    }

    let mut seen = HashSet::new();
    let mut referenced = HashSet::new();
    let mut checked = 0;

    for item in backlog.metadata().all_items() {
        checked += 1;
        let item_type = item.item_type();

        if !seen.insert(item.id.as_str()) {
            issues.push(Issue {
                kind: IssueKind::DuplicateId,
                severity: IssueSeverity::High,
                item_id: Some(item.id.clone()),
                path: None,
                message: format!("ID {} appears more than once", item.id),
            });
        }

        if let Some(text) = &item.unknown_status {
            issues.push(Issue {
                kind: IssueKind::InvalidStatus,
                severity: IssueSeverity::High,
                item_id: Some(item.id.clone()),
                path: None,
                message: format!(
                    "status '{text}' is not one of {}",
                    Status::all().iter().map(|s| s.as_str()).collect::<Vec<_>>().join(", ")
                ),
            });
        }
        if let Some(text) = &item.unknown_priority {
            issues.push(Issue {
                kind: IssueKind::InvalidPriority,
                severity: IssueSeverity::Medium,
                item_id: Some(item.id.clone()),
                path: None,
                message: format!("priority '{text}' is not one of critical, high, medium, low"),
            });
        }

        let file_name = Path::new(&item.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !paths::follows_naming_convention(&file_name, item_type) {
            issues.push(Issue {
                kind: IssueKind::Naming,
                severity: IssueSeverity::Medium,
                item_id: Some(item.id.clone()),
                path: Some(item.file_path.clone()),
                message: format!(
                    "{} artifact '{file_name}' should be named {}####[_slug].md",
                    item_type.label(),
                    item_type.prefix()
                ),
            });
        }

        if paths::is_marked_done(&item.file_path) != item.is_done() {
            issues.push(Issue {
                kind: IssueKind::DoneMarker,
                severity: IssueSeverity::High,
                item_id: Some(item.id.clone()),
                path: Some(item.file_path.clone()),
                message: format!(
                    "status '{}' disagrees with artifact name '{file_name}'",
                    item.status
                ),
            });
        }

        let resolved = paths::resolve(root, &item.file_path);
        if resolved.exists() {
            referenced.insert(resolved);
        } else {
            issues.push(Issue {
                kind: IssueKind::MissingFile,
                severity: IssueSeverity::Medium,
                item_id: Some(item.id.clone()),
                path: Some(item.file_path.clone()),
                message: "artifact file does not exist".to_string(),
            });
        }
    }

    for item_type in ItemType::all() {
        let dir = root.join(paths::type_dir(&backlog.config().backlog_dir, *item_type));
        if !dir.is_dir() {
            continue;
        }
        for entry in std::fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            if !referenced.contains(&path) {
                let rel = path.strip_prefix(root).unwrap_or(&path);
                issues.push(Issue {
                    kind: IssueKind::OrphanFile,
                    severity: IssueSeverity::Low,
                    item_id: None,
                    path: Some(rel.to_string_lossy().into_owned()),
                    message: "artifact is not referenced by any backlog item".to_string(),
                });
            }
        }
    }

    Ok(Report {
        ok: issues.is_empty(),
        checked,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backlog::BacklogMetadata;
    use crate::config::Config;
    use crate::item::{Item, NewItem};
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn fresh_backlog_is_clean() {
        let dir = TempDir::new().unwrap();
        let mut backlog = Backlog::open(dir.path()).unwrap();
        backlog.create(NewItem::new(ItemType::Feature, "Login")).unwrap();
        backlog.create(NewItem::new(ItemType::Epic, "Launch")).unwrap();
        backlog.update_status("F0001", Status::Done).unwrap();

        let report = check(&backlog).unwrap();
        assert!(report.ok, "unexpected issues: {:?}", report.issues);
        assert_eq!(report.checked, 2);
    }

    #[test]
    fn flags_disagreeing_marker_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut item = Item::new(
            "B0001",
            NewItem::new(ItemType::Bug, "Crash"),
            "backlog/bugs/B0001_crash.md",
            Utc::now(),
        );
        item.status = Status::Done;
        let metadata = BacklogMetadata {
            bugs: vec![item],
            ..BacklogMetadata::default()
        };
        let backlog = Backlog::from_parts(dir.path(), Config::default(), metadata);

        let report = check(&backlog).unwrap();
        assert!(!report.ok);
        let kinds: Vec<IssueKind> = report.issues.iter().map(|i| i.kind).collect();
        assert!(kinds.contains(&IssueKind::DoneMarker));
        assert!(kinds.contains(&IssueKind::MissingFile));
    }

    #[test]
    fn flags_bad_names_and_orphans() {
        let dir = TempDir::new().unwrap();
        let mut backlog = Backlog::open(dir.path()).unwrap();
        backlog.create(NewItem::new(ItemType::TechDebt, "Cache")).unwrap();
        std::fs::write(dir.path().join("backlog/tech_debt/notes.md"), "scratch").unwrap();

        let item = Item::new(
            "F0001",
            NewItem::new(ItemType::Feature, "Odd"),
            "backlog/features/Feature-1.md",
            Utc::now(),
        );
        let mut metadata = backlog.metadata().clone();
        metadata.features.push(item);
        let backlog = Backlog::from_parts(dir.path(), Config::default(), metadata);

        let report = check(&backlog).unwrap();
        let naming = report
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::Naming)
            .unwrap();
        assert_eq!(naming.item_id.as_deref(), Some("F0001"));
        assert!(report
            .issues
            .iter()
            .any(|i| i.kind == IssueKind::OrphanFile
                && i.path.as_deref().is_some_and(|p| p.ends_with("notes.md"))));
    }

    #[test]
    fn flags_unrecognised_status_and_priority() {
        let dir = TempDir::new().unwrap();
        let mut backlog = Backlog::open(dir.path()).unwrap();
        backlog.create(NewItem::new(ItemType::Feature, "Review me")).unwrap();

        let mut metadata = backlog.metadata().clone();
        metadata.features[0].unknown_status = Some("review".to_string());
        metadata.features[0].unknown_priority = Some("urgent".to_string());
        let backlog = Backlog::from_parts(dir.path(), Config::default(), metadata);

        let report = check(&backlog).unwrap();
        assert!(!report.ok);
        let status = report
            .issues
            .iter()
            .find(|i| i.kind == IssueKind::InvalidStatus)
            .unwrap();
        assert_eq!(status.item_id.as_deref(), Some("F0001"));
        assert!(status.message.contains("'review'"));
        assert!(report.issues.iter().any(|i| i.kind == IssueKind::InvalidPriority));
    }
}

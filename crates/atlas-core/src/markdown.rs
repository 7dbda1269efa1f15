use crate::error::Result;
use crate::item::{Details, Item};
use std::fmt::Write as _;
use std::path::Path;

pub const STATUS_HEADER: &str = "## Status";

const TBD: &str = "To be defined";

/// Render the full markdown artifact for an item.
pub fn render(item: &Item, score: u32) -> String {
    let mut out = String::new();
    let description = if item.description.trim().is_empty() {
        TBD
    } else {
        item.description.as_str()
    };

    let _ = writeln!(out, "# {}: {}\n", item.id, item.title);
    let _ = writeln!(out, "## Type\n{}\n", item.item_type().label());
    let _ = writeln!(out, "## Priority\n{} (Score: {score})\n", capitalize(item.priority.as_str()));
    let _ = writeln!(out, "{STATUS_HEADER}\n{}\n", item.status_label());
    let _ = writeln!(out, "## Description\n{description}\n");

    match &item.details {
        Details::Feature(f) => {
            let _ = writeln!(out, "## Business Value\n{}\n", f.business_value);
            let _ = writeln!(out, "## Effort\n{}\n", f.effort);
            out.push_str("## Acceptance Criteria\n");
            push_list(&mut out, &f.acceptance_criteria, "- [ ]");
        }
        Details::Bug(b) => {
            let _ = writeln!(out, "## Severity\n{}\n", b.severity);
            let _ = writeln!(out, "## User Impact\n{}\n", b.user_impact);
            out.push_str("## Steps to Reproduce\n");
            push_list(&mut out, &b.steps_to_reproduce, "1.");
        }
        Details::TechDebt(t) => {
            let impact = if t.impact.trim().is_empty() { TBD } else { t.impact.as_str() };
            let _ = writeln!(out, "## Risk Level\n{}\n", t.risk);
            let _ = writeln!(out, "## Effort Required\n{}\n", t.effort);
            let _ = writeln!(out, "## Impact if Not Addressed\n{impact}");
        }
        Details::Epic(e) => {
            let goal = if e.business_goal.trim().is_empty() { TBD } else { e.business_goal.as_str() };
            let _ = writeln!(out, "## Business Goal\n{goal}\n");
            let _ = writeln!(out, "## Target Date\n{}\n", e.target_date.as_deref().unwrap_or("TBD"));
            out.push_str("## Features\n");
            push_list(&mut out, &e.features, "- [ ]");
        }
    }

    if let Some(created) = item.created_at {
        let _ = writeln!(out, "\n## Created\n{}", created.to_rfc3339());
    }
    out
}

fn push_list(out: &mut String, entries: &[String], bullet: &str) {
    if entries.is_empty() {
        let _ = writeln!(out, "{bullet} {TBD}");
        return;
    }
    for entry in entries {
        let _ = writeln!(out, "{bullet} {entry}");
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Write the artifact for `item` at `path`, replacing whatever is there.
/// The record is the source of truth; the file is a generated view of it.
pub fn write_artifact(path: &Path, item: &Item, score: u32) -> Result<()> {
    crate::io::atomic_write(path, render(item, score).as_bytes())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

use crate::output::print_json;
use anyhow::Context;
use atlas_core::{check, Backlog};
use std::path::Path;

pub fn run(root: &Path) -> anyhow::Result<()> {
    let backlog = Backlog::open(root).context("failed to load backlog")?;
    let report = check::check(&backlog).context("consistency check failed")?;
    if !report.ok {
        tracing::warn!(issues = report.issues.len(), "backlog has consistency issues");
    }
    print_json(&report)
}

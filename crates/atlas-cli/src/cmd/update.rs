use crate::output::{print_json, with_fields};
use anyhow::Context;
use atlas_core::types::Status;
use atlas_core::Backlog;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

pub fn run(root: &Path, item_id: &str, new_status: &str) -> anyhow::Result<()> {
    // Reject unknown statuses before the store is touched.
    let target = Status::from_str(new_status)?;

    let mut backlog = Backlog::open(root).context("failed to load backlog")?;
    let change = backlog.update_status(item_id, target)?;
    tracing::info!(id = item_id, from = %change.old_status, to = %change.new_status, "status updated");

    print_json(&with_fields(
        &change,
        [
            ("success", Value::Bool(true)),
            ("action", Value::from("update_status")),
        ],
    )?)
}

use crate::output::print_json;
use anyhow::Context;
use atlas_core::{paths, score, Backlog};
use chrono::Utc;
use std::path::Path;

pub fn run(root: &Path, item_id: &str) -> anyhow::Result<()> {
    let backlog = Backlog::open(root).context("failed to load backlog")?;
    let item = backlog.get(item_id)?;

    let artifact = paths::resolve(root, &item.file_path);
    let content = if artifact.exists() {
        Some(
            std::fs::read_to_string(&artifact)
                .with_context(|| format!("failed to read {}", artifact.display()))?,
        )
    } else {
        None
    };

    let breakdown = score::breakdown_at(item, Utc::now());
    print_json(&serde_json::json!({
        "action": "get_item",
        "item": item,
        "priority_score": breakdown.total,
        "score_breakdown": breakdown,
        "content": content,
    }))
}

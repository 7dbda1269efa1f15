use crate::output::{print_json, print_table, with_fields};
use anyhow::Context;
use atlas_core::types::{Status, TypeFilter};
use atlas_core::Backlog;
use serde_json::Value;
use std::path::Path;
use std::str::FromStr;

pub fn run(
    root: &Path,
    item_type: &str,
    status: Option<&str>,
    limit: Option<usize>,
    table: bool,
) -> anyhow::Result<()> {
    let filter = TypeFilter::from_str(item_type)?;
    let status = status.map(Status::from_str).transpose()?;

    let backlog = Backlog::open(root).context("failed to load backlog")?;
    let limit = limit.or(backlog.config().list_limit);
    let mut ranked = backlog.prioritized(filter, status);
    if let Some(n) = limit {
        ranked.truncate(n);
    }

    if table {
        if ranked.is_empty() {
            println!("No backlog items.");
            return Ok(());
        }
        let rows = ranked
            .iter()
            .map(|r| {
                vec![
                    r.item.id.clone(),
                    r.item.item_type().to_string(),
                    r.item.priority.to_string(),
                    r.score.to_string(),
                    r.item.status_label().to_string(),
                    r.item.display_title(),
                ]
            })
            .collect();
        print_table(&["ID", "TYPE", "PRIORITY", "SCORE", "STATUS", "TITLE"], rows);
        return Ok(());
    }

    let items = ranked
        .iter()
        .map(|r| {
            with_fields(
                r.item,
                [
                    ("priority_score", Value::from(r.score)),
                    ("display_title", Value::from(r.item.display_title())),
                ],
            )
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    print_json(&serde_json::json!({
        "action": "list_items",
        "type_filter": filter.to_string(),
        "status_filter": status.map(|s| s.to_string()),
        "count": items.len(),
        "items": items,
    }))
}

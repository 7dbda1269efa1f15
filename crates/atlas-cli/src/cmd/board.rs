use crate::output::{print_json, print_table};
use anyhow::Context;
use atlas_core::board::Board;
use atlas_core::Backlog;
use chrono::Utc;
use std::path::Path;

pub fn run(root: &Path, table: bool) -> anyhow::Result<()> {
    let backlog = Backlog::open(root).context("failed to load backlog")?;
    let board = Board::build(backlog.metadata().all_items(), Utc::now());

    if !table {
        return print_json(&board);
    }

    println!(
        "{} items, {} done ({}%), {} in progress, {} blocked\n",
        board.total, board.done, board.completion_pct, board.in_progress, board.blocked
    );
    let rows = board
        .columns
        .iter()
        .flat_map(|col| {
            col.cards.iter().map(move |card| {
                vec![
                    col.status.to_string(),
                    card.id.clone(),
                    card.item_type.to_string(),
                    card.score.to_string(),
                    card.title.clone(),
                ]
            })
        })
        .collect();
    print_table(&["STATUS", "ID", "TYPE", "SCORE", "TITLE"], rows);
    Ok(())
}

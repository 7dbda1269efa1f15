use crate::item::Item;
use crate::score;
use crate::types::{ItemType, Level, Status};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Card {
    pub id: String,
    pub title: String,
    pub item_type: ItemType,
    pub priority: Level,
    pub score: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct Column {
    pub status: Status,
    pub count: usize,
    pub cards: Vec<Card>,
}

/// Kanban view of the backlog: one column per canonical status, cards
/// ordered by score within a column.
#[derive(Debug, Clone, Serialize)]
pub struct Board {
    pub total: usize,
    pub done: usize,
    pub in_progress: usize,
    pub blocked: usize,
    /// Whole-number share of items in the done column.
    pub completion_pct: u32,
    pub columns: Vec<Column>,
}

impl Board {
    pub fn build<'a>(items: impl IntoIterator<Item = &'a Item>, now: DateTime<Utc>) -> Self {
        let mut columns: Vec<Column> = Status::all()
            .iter()
            .map(|s| Column {
                status: *s,
                count: 0,
                cards: Vec::new(),
            })
            .collect();

        for item in items {
            // Status::all() covers every variant.
            if let Some(col) = columns.iter_mut().find(|c| c.status == item.status) {
                col.cards.push(Card {
                    id: item.id.clone(),
                    title: item.title.clone(),
                    item_type: item.item_type(),
                    priority: item.priority,
                    score: score::score_at(item, now),
                });
            }
        }

        for col in &mut columns {
            col.cards.sort_by(|a, b| b.score.cmp(&a.score));
            col.count = col.cards.len();
        }

        let total: usize = columns.iter().map(|c| c.count).sum();
        let mut board = Self {
            total,
            done: 0,
            in_progress: 0,
            blocked: 0,
            completion_pct: 0,
            columns,
        };
        let count = |s: Status| board.column(s).map_or(0, |c| c.count);
        let (done, in_progress, blocked) = (
            count(Status::Done),
            count(Status::InProgress),
            count(Status::Blocked),
        );
        board.done = done;
        board.in_progress = in_progress;
        board.blocked = blocked;
        if total > 0 {
            board.completion_pct = (done * 100 / total) as u32;
        }
        board
    }

    pub fn column(&self, status: Status) -> Option<&Column> {
        self.columns.iter().find(|c| c.status == status)
    }
}

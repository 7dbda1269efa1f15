//! WSJF-inspired priority scoring.
//!
//! The score is an additive point total used only for ordering. It is never
//! persisted as ground truth: callers recompute it on every list or sort.

use crate::item::{Details, Item};
use crate::types::{Effort, Level, Status};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const AGE_POINTS_PER_DAY: i64 = 5;
pub const MAX_AGE_BONUS: u32 = 200;

// ---------------------------------------------------------------------------
// Weight tables
// ---------------------------------------------------------------------------

pub fn base_score(priority: Level) -> u32 {
    match priority {
        Level::Critical => 1000,
        Level::High => 750,
        Level::Medium => 500,
        Level::Low => 250,
    }
}

/// Weight for business value, bug severity and tech-debt risk.
pub fn value_weight(level: Level) -> u32 {
    match level {
        Level::Critical => 400,
        Level::High => 300,
        Level::Medium => 200,
        Level::Low => 100,
    }
}

/// Weight for bug user impact.
pub fn impact_weight(level: Level) -> u32 {
    match level {
        Level::Critical => 300,
        Level::High => 200,
        Level::Medium => 100,
        Level::Low => 50,
    }
}

pub fn effort_multiplier(effort: Effort) -> f64 {
    match effort {
        Effort::Small => 1.5,
        Effort::Medium => 1.0,
        Effort::Large => 0.7,
        Effort::Xl => 0.5,
    }
}

pub fn status_boost(status: Status) -> u32 {
    match status {
        Status::Blocked => 500,
        Status::InProgress => 300,
        Status::InReview => 250,
        Status::Ready => 100,
        Status::Backlog | Status::Testing | Status::Done => 0,
    }
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

fn weighted(weight: u32, effort: Effort) -> u32 {
    (f64::from(weight) * effort_multiplier(effort)).round() as u32
}

pub fn type_bonus(details: &Details) -> u32 {
    match details {
        Details::Bug(b) => value_weight(b.severity) + impact_weight(b.user_impact),
        Details::Feature(f) => weighted(value_weight(f.business_value), f.effort),
        Details::TechDebt(t) => weighted(value_weight(t.risk), t.effort),
        Details::Epic(_) => 0,
    }
}

/// Five points per whole day of age, capped. Unknown or future creation
/// times contribute nothing.
pub fn age_bonus(created_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(created) = created_at else {
        return 0;
    };
    let days = (now - created).num_days().max(0);
    let points = days.saturating_mul(AGE_POINTS_PER_DAY);
    points.min(i64::from(MAX_AGE_BONUS)) as u32
}

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreBreakdown {
    pub base: u32,
    pub type_bonus: u32,
    pub status_boost: u32,
    pub age_bonus: u32,
    pub total: u32,
}

pub fn breakdown_at(item: &Item, now: DateTime<Utc>) -> ScoreBreakdown {
    let base = base_score(item.priority);
    let type_bonus = type_bonus(&item.details);
    let status_boost = status_boost(item.status);
    let age_bonus = age_bonus(item.created_at, now);
    ScoreBreakdown {
        base,
        type_bonus,
        status_boost,
        age_bonus,
        total: base + type_bonus + status_boost + age_bonus,
    }
}

/// Score an item as of `now`.
pub fn score_at(item: &Item, now: DateTime<Utc>) -> u32 {
    breakdown_at(item, now).total
}

pub fn score(item: &Item) -> u32 {
    score_at(item, Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

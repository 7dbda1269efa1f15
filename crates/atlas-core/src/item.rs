use crate::types::{Effort, ItemType, Level, Status};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ---------------------------------------------------------------------------
// Details (type-specific fields)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureDetails {
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub business_value: Level,
    #[serde(default, deserialize_with = "lenient_effort")]
    pub effort: Effort,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BugDetails {
    #[serde(default, deserialize_with = "lenient_level")]
    pub severity: Level,
    #[serde(default, deserialize_with = "lenient_level")]
    pub user_impact: Level,
    #[serde(default)]
    pub steps_to_reproduce: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechDebtDetails {
    #[serde(default, deserialize_with = "lenient_level")]
    pub risk: Level,
    #[serde(default, deserialize_with = "lenient_effort")]
    pub effort: Effort,
    /// What happens if the debt is left alone.
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpicDetails {
    /// Informal references to member items; not checked against the store.
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub business_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Details {
    Feature(FeatureDetails),
    Bug(BugDetails),
    TechDebt(TechDebtDetails),
    Epic(EpicDetails),
}

impl Details {
    pub fn default_for(item_type: ItemType) -> Self {
        match item_type {
            ItemType::Feature => Details::Feature(FeatureDetails {
                acceptance_criteria: Vec::new(),
                business_value: Level::Medium,
                effort: Effort::Medium,
            }),
            ItemType::Bug => Details::Bug(BugDetails {
                severity: Level::Medium,
                user_impact: Level::Medium,
                steps_to_reproduce: Vec::new(),
            }),
            ItemType::TechDebt => Details::TechDebt(TechDebtDetails {
                risk: Level::Medium,
                effort: Effort::Medium,
                impact: String::new(),
            }),
            ItemType::Epic => Details::Epic(EpicDetails {
                features: Vec::new(),
                business_goal: String::new(),
                target_date: None,
            }),
        }
    }

    pub fn item_type(&self) -> ItemType {
        match self {
            Details::Feature(_) => ItemType::Feature,
            Details::Bug(_) => ItemType::Bug,
            Details::TechDebt(_) => ItemType::TechDebt,
            Details::Epic(_) => ItemType::Epic,
        }
    }

    /// Priority implied by the type-specific fields when the caller gives none.
    pub fn derived_priority(&self) -> Level {
        match self {
            Details::Feature(_) => Level::Medium,
            Details::Bug(b) => bug_priority(b.severity, b.user_impact),
            Details::TechDebt(t) => tech_debt_priority(t.risk, t.effort),
            Details::Epic(e) => {
                if e.business_goal.trim().is_empty() {
                    Level::Medium
                } else {
                    Level::High
                }
            }
        }
    }
}

fn bug_priority(severity: Level, impact: Level) -> Level {
    if severity == Level::Critical || impact == Level::Critical {
        Level::Critical
    } else if severity == Level::High || impact == Level::High {
        Level::High
    } else if severity == Level::Low && impact == Level::Low {
        Level::Low
    } else {
        Level::Medium
    }
}

fn tech_debt_priority(risk: Level, effort: Effort) -> Level {
    match risk {
        Level::Critical if effort == Effort::Xl => Level::High,
        Level::Critical => Level::Critical,
        Level::High if matches!(effort, Effort::Small | Effort::Medium) => Level::High,
        Level::High => Level::Medium,
        Level::Low => Level::Low,
        Level::Medium => Level::Medium,
    }
}

// ---------------------------------------------------------------------------
// NewItem
// ---------------------------------------------------------------------------

/// Caller-supplied fields for a new backlog item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    /// Explicit priority; `None` falls back to [`Details::derived_priority`].
    pub priority: Option<Level>,
    pub details: Details,
}

impl NewItem {
    pub fn new(item_type: ItemType, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: None,
            details: Details::default_for(item_type),
        }
    }

    pub fn with_details(title: impl Into<String>, details: Details) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: None,
            details,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Level) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn item_type(&self) -> ItemType {
        self.details.item_type()
    }
}

// ---------------------------------------------------------------------------
// Item
// ---------------------------------------------------------------------------

/// A backlog item.
///
/// Status and priority text outside the canonical sets does not make the
/// document unreadable: the record ranks and filters as the default value,
/// keeps the original text, and writes it back unchanged until a status
/// change replaces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ItemRecord", into = "ItemRecord")]
pub struct Item {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: Status,
    pub priority: Level,
    /// Stored status text that is not a known status or synonym.
    pub unknown_status: Option<String>,
    /// Stored priority text that is not a known level.
    pub unknown_priority: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Artifact path relative to the project root.
    pub file_path: String,
    pub details: Details,
}

/// On-disk shape of an [`Item`].
#[derive(Serialize, Deserialize)]
struct ItemRecord {
    id: String,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    status: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    priority: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    created_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    updated_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    started_at: Option<DateTime<Utc>>,
    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    completed_at: Option<DateTime<Utc>>,
    file_path: String,
    #[serde(flatten)]
    details: Details,
}

/// Split stored text into a recognised value or the text itself. Blank text
/// counts as absent.
fn recognise<T>(
    raw: Option<String>,
    parse: impl Fn(&str) -> Option<T>,
) -> (Option<T>, Option<String>) {
    match raw {
        Some(text) if !text.trim().is_empty() => match parse(&text) {
            Some(value) => (Some(value), None),
            None => (None, Some(text)),
        },
        _ => (None, None),
    }
}

impl From<ItemRecord> for Item {
    fn from(record: ItemRecord) -> Self {
        let (status, unknown_status) = recognise(record.status, |s| s.parse::<Status>().ok());
        let (priority, unknown_priority) = recognise(record.priority, Level::parse);
        if let Some(text) = &unknown_status {
            tracing::warn!(id = %record.id, status = %text, "unrecognised status, ranked as backlog");
        }
        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            status: status.unwrap_or_default(),
            priority: priority.unwrap_or_default(),
            unknown_status,
            unknown_priority,
            created_at: record.created_at,
            updated_at: record.updated_at,
            started_at: record.started_at,
            completed_at: record.completed_at,
            file_path: record.file_path,
            details: record.details,
        }
    }
}

impl From<Item> for ItemRecord {
    fn from(item: Item) -> Self {
        Self {
            status: Some(
                item.unknown_status
                    .unwrap_or_else(|| item.status.as_str().to_string()),
            ),
            priority: Some(
                item.unknown_priority
                    .unwrap_or_else(|| item.priority.as_str().to_string()),
            ),
            id: item.id,
            title: item.title,
            description: item.description,
            created_at: item.created_at,
            updated_at: item.updated_at,
            started_at: item.started_at,
            completed_at: item.completed_at,
            file_path: item.file_path,
            details: item.details,
        }
    }
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        new: NewItem,
        file_path: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let priority = new
            .priority
            .unwrap_or_else(|| new.details.derived_priority());
        Self {
            id: id.into(),
            title: new.title,
            description: new.description,
            status: Status::Backlog,
            priority,
            unknown_status: None,
            unknown_priority: None,
            created_at: Some(now),
            updated_at: Some(now),
            started_at: None,
            completed_at: None,
            file_path: file_path.into(),
            details: new.details,
        }
    }

    pub fn item_type(&self) -> ItemType {
        self.details.item_type()
    }

    pub fn is_done(&self) -> bool {
        self.status.is_done()
    }

    /// Status as stored: the unrecognised text if there is one.
    pub fn status_label(&self) -> &str {
        self.unknown_status
            .as_deref()
            .unwrap_or_else(|| self.status.as_str())
    }

    pub fn display_title(&self) -> String {
        if self.is_done() {
            format!("{} [DONE]", self.title)
        } else {
            self.title.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// Lenient deserializers
// ---------------------------------------------------------------------------

/// Parse an RFC 3339 timestamp, or a naive ISO timestamp taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(parse_timestamp))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

fn lenient_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .map(Level::normalize)
        .unwrap_or_default())
}

fn lenient_effort<'de, D>(deserializer: D) -> Result<Effort, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .map(Effort::normalize)
        .unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bug_priority_from_severity_and_impact() {
        assert_eq!(bug_priority(Level::Critical, Level::Low), Level::Critical);
        assert_eq!(bug_priority(Level::Low, Level::High), Level::High);
        assert_eq!(bug_priority(Level::Low, Level::Low), Level::Low);
        assert_eq!(bug_priority(Level::Low, Level::Medium), Level::Medium);
    }

    #[test]
    fn tech_debt_priority_from_risk_and_effort() {
        assert_eq!(tech_debt_priority(Level::Critical, Effort::Large), Level::Critical);
        assert_eq!(tech_debt_priority(Level::Critical, Effort::Xl), Level::High);
        assert_eq!(tech_debt_priority(Level::High, Effort::Small), Level::High);
        assert_eq!(tech_debt_priority(Level::High, Effort::Large), Level::Medium);
        assert_eq!(tech_debt_priority(Level::Low, Effort::Small), Level::Low);
    }

    #[test]
    fn epic_priority_follows_goal() {
        let mut details = Details::default_for(ItemType::Epic);
        assert_eq!(details.derived_priority(), Level::Medium);
        if let Details::Epic(ref mut e) = details {
            e.business_goal = "Grow retention".to_string();
        }
        assert_eq!(details.derived_priority(), Level::High);
    }

    #[test]
    fn explicit_priority_wins() {
        let new = NewItem::new(ItemType::Bug, "Crash").priority(Level::Low);
        let item = Item::new("B0001", new, "B0001_crash.md", Utc::now());
        assert_eq!(item.priority, Level::Low);
        assert_eq!(item.status, Status::Backlog);
    }

    #[test]
    fn item_json_carries_type_tag() {
        let item = Item::new(
            "T0001",
            NewItem::new(ItemType::TechDebt, "Refactor db"),
            "backlog/tech_debt/T0001_refactor_db.md",
            Utc::now(),
        );
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "tech_debt");
        assert_eq!(value["risk"], "medium");
        assert_eq!(value["status"], "backlog");
        assert!(value.get("started_at").is_none());

        let parsed: Item = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn legacy_record_loads() {
        let json = r#"{
            "id": "F0007",
            "type": "feature",
            "title": "Legacy",
            "acceptance_criteria": [],
            "priority": "High",
            "business_value": null,
            "status": "completed",
            "created_at": "2024-03-01T10:15:30.123456",
            "file_path": "features/_F0007_legacy.md",
            "priority_score": 950
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, Status::Done);
        assert_eq!(item.priority, Level::High);
        assert!(item.created_at.is_some());
        match item.details {
            Details::Feature(f) => {
                assert_eq!(f.business_value, Level::Medium);
                assert_eq!(f.effort, Effort::Medium);
            }
            other => panic!("expected feature, got {other:?}"),
        }
    }

    #[test]
    fn malformed_timestamp_is_absent() {
        let json = r#"{
            "id": "B0001",
            "type": "bug",
            "title": "Bad date",
            "created_at": "yesterday-ish",
            "file_path": "B0001.md"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert!(item.created_at.is_none());
    }

    #[test]
    fn display_title_marks_done() {
        let mut item = Item::new("E0001", NewItem::new(ItemType::Epic, "Launch"), "E0001.md", Utc::now());
        assert_eq!(item.display_title(), "Launch");
        item.status = Status::Done;
        assert_eq!(item.display_title(), "Launch [DONE]");
    }

    #[test]
    fn unknown_status_and_priority_are_kept() {
        let json = r#"{
            "id": "F0002", "type": "feature", "title": "Review me",
            "status": "review", "priority": "urgent",
            "file_path": "backlog/features/F0002_review_me.md"
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, Status::Backlog);
        assert_eq!(item.priority, Level::Medium);
        assert_eq!(item.unknown_status.as_deref(), Some("review"));
        assert_eq!(item.unknown_priority.as_deref(), Some("urgent"));
        assert_eq!(item.status_label(), "review");

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["status"], "review");
        assert_eq!(value["priority"], "urgent");
    }

    #[test]
    fn dashed_status_loads_like_the_cli_form() {
        let json = r#"{"id": "B0001", "type": "bug", "title": "x",
            "status": "in-progress", "file_path": "B0001.md"}"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.status, Status::InProgress);
        assert!(item.unknown_status.is_none());
    }
}

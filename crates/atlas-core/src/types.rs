use crate::error::AtlasError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Level
// ---------------------------------------------------------------------------

/// Four-step rating shared by priority, business value, severity, user impact
/// and risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

impl Level {
    pub fn all() -> &'static [Level] {
        &[Level::Critical, Level::High, Level::Medium, Level::Low]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Critical => "critical",
            Level::High => "high",
            Level::Medium => "medium",
            Level::Low => "low",
        }
    }

    /// Case-insensitive parse. `None` for anything outside the four levels.
    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_ascii_lowercase().as_str() {
            "critical" => Some(Level::Critical),
            "high" => Some(Level::High),
            "medium" => Some(Level::Medium),
            "low" => Some(Level::Low),
            _ => None,
        }
    }

    /// Like [`Level::parse`], but anything unrecognised becomes `Medium`.
    pub fn normalize(s: &str) -> Level {
        Level::parse(s).unwrap_or_else(|| {
            tracing::warn!(input = s, "unknown level, defaulting to medium");
            Level::Medium
        })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Effort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effort {
    Small,
    #[default]
    Medium,
    Large,
    Xl,
}

impl Effort {
    pub fn all() -> &'static [Effort] {
        &[Effort::Small, Effort::Medium, Effort::Large, Effort::Xl]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Effort::Small => "small",
            Effort::Medium => "medium",
            Effort::Large => "large",
            Effort::Xl => "xl",
        }
    }

    /// Case-insensitive parse; anything unrecognised becomes `Medium`.
    pub fn normalize(s: &str) -> Effort {
        match s.trim().to_ascii_lowercase().as_str() {
            "small" => Effort::Small,
            "medium" => Effort::Medium,
            "large" => Effort::Large,
            "xl" => Effort::Xl,
            other => {
                tracing::warn!(input = other, "unknown effort, defaulting to medium");
                Effort::Medium
            }
        }
    }
}

impl fmt::Display for Effort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Canonical workflow status. Deserializes through [`FromStr`], so stored
/// documents accept the same synonyms as the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Status {
    #[default]
    Backlog,
    Ready,
    InProgress,
    InReview,
    Testing,
    Done,
    Blocked,
}

impl Status {
    pub fn all() -> &'static [Status] {
        &[
            Status::Backlog,
            Status::Ready,
            Status::InProgress,
            Status::InReview,
            Status::Testing,
            Status::Done,
            Status::Blocked,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Backlog => "backlog",
            Status::Ready => "ready",
            Status::InProgress => "in_progress",
            Status::InReview => "in_review",
            Status::Testing => "testing",
            Status::Done => "done",
            Status::Blocked => "blocked",
        }
    }

    pub fn is_done(self) -> bool {
        matches!(self, Status::Done)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "backlog" | "open" | "planning" | "todo" => Ok(Status::Backlog),
            "ready" => Ok(Status::Ready),
            "in_progress" => Ok(Status::InProgress),
            "in_review" => Ok(Status::InReview),
            "testing" => Ok(Status::Testing),
            "done" | "completed" | "resolved" | "closed" => Ok(Status::Done),
            "blocked" => Ok(Status::Blocked),
            _ => Err(AtlasError::InvalidStatus(s.to_string())),
        }
    }
}

impl TryFrom<String> for Status {
    type Error = AtlasError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Status::from_str(&s)
    }
}

// ---------------------------------------------------------------------------
// ItemType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Feature,
    Bug,
    TechDebt,
    Epic,
}

impl ItemType {
    pub fn all() -> &'static [ItemType] {
        &[
            ItemType::Feature,
            ItemType::Bug,
            ItemType::TechDebt,
            ItemType::Epic,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ItemType::Feature => "feature",
            ItemType::Bug => "bug",
            ItemType::TechDebt => "tech_debt",
            ItemType::Epic => "epic",
        }
    }

    /// ID prefix: `F0001`, `B0001`, `T0001`, `E0001`.
    pub fn prefix(self) -> &'static str {
        match self {
            ItemType::Feature => "F",
            ItemType::Bug => "B",
            ItemType::TechDebt => "T",
            ItemType::Epic => "E",
        }
    }

    pub fn dir_name(self) -> &'static str {
        match self {
            ItemType::Feature => "features",
            ItemType::Bug => "bugs",
            ItemType::TechDebt => "tech_debt",
            ItemType::Epic => "epics",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ItemType::Feature => "Feature",
            ItemType::Bug => "Bug",
            ItemType::TechDebt => "Technical Debt",
            ItemType::Epic => "Epic",
        }
    }

    pub fn untitled(self) -> &'static str {
        match self {
            ItemType::Feature => "Untitled Feature",
            ItemType::Bug => "Untitled Bug",
            ItemType::TechDebt => "Untitled Tech Debt",
            ItemType::Epic => "Untitled Epic",
        }
    }

    /// Infer the type from an ID prefix.
    pub fn from_id(id: &str) -> Option<ItemType> {
        ItemType::all()
            .iter()
            .copied()
            .find(|t| id.starts_with(t.prefix()))
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feature" | "features" | "story" => Ok(ItemType::Feature),
            "bug" | "bugs" => Ok(ItemType::Bug),
            "tech_debt" | "tech-debt" | "techdebt" => Ok(ItemType::TechDebt),
            "epic" | "epics" => Ok(ItemType::Epic),
            _ => Err(AtlasError::InvalidItemType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// TypeFilter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeFilter {
    #[default]
    All,
    Only(ItemType),
}

impl TypeFilter {
    pub fn matches(self, item_type: ItemType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Only(t) => t == item_type,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Only(t) => t.fmt(f),
        }
    }
}

impl FromStr for TypeFilter {
    type Err = AtlasError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(TypeFilter::All);
        }
        ItemType::from_str(s).map(TypeFilter::Only)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_normalize_is_lenient() {
        assert_eq!(Level::normalize("HIGH"), Level::High);
        assert_eq!(Level::normalize(" low "), Level::Low);
        assert_eq!(Level::normalize("urgent"), Level::Medium);
        assert_eq!(Level::normalize(""), Level::Medium);
    }

    #[test]
    fn level_parse_is_strict() {
        assert_eq!(Level::parse("Critical"), Some(Level::Critical));
        assert_eq!(Level::parse("urgent"), None);
    }

    #[test]
    fn effort_normalize_is_lenient() {
        assert_eq!(Effort::normalize("XL"), Effort::Xl);
        assert_eq!(Effort::normalize("huge"), Effort::Medium);
    }

    #[test]
    fn status_synonyms_normalize_to_done() {
        for s in ["done", "completed", "resolved", "closed", "Closed"] {
            assert_eq!(Status::from_str(s).unwrap(), Status::Done, "{s}");
        }
    }

    #[test]
    fn status_accepts_dashes_and_open() {
        assert_eq!(Status::from_str("in-progress").unwrap(), Status::InProgress);
        assert_eq!(Status::from_str("open").unwrap(), Status::Backlog);
    }

    #[test]
    fn status_rejects_unknown() {
        let err = Status::from_str("finished-ish").unwrap_err();
        assert!(matches!(err, AtlasError::InvalidStatus(ref s) if s == "finished-ish"));
    }

    #[test]
    fn status_serde_aliases() {
        let parsed: Status = serde_json::from_str("\"resolved\"").unwrap();
        assert_eq!(parsed, Status::Done);
        let parsed: Status = serde_json::from_str("\"planning\"").unwrap();
        assert_eq!(parsed, Status::Backlog);
        let parsed: Status = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(parsed, Status::InProgress);
        assert!(serde_json::from_str::<Status>("\"review\"").is_err());
        assert_eq!(serde_json::to_string(&Status::InReview).unwrap(), "\"in_review\"");
    }

    #[test]
    fn status_display_matches_parse() {
        for status in Status::all() {
            assert_eq!(Status::from_str(status.as_str()).unwrap(), *status);
        }
    }

    #[test]
    fn item_type_from_id() {
        assert_eq!(ItemType::from_id("F0001"), Some(ItemType::Feature));
        assert_eq!(ItemType::from_id("T0042"), Some(ItemType::TechDebt));
        assert_eq!(ItemType::from_id("X0001"), None);
    }

    #[test]
    fn type_filter_parse() {
        assert_eq!(TypeFilter::from_str("all").unwrap(), TypeFilter::All);
        assert_eq!(
            TypeFilter::from_str("tech_debt").unwrap(),
            TypeFilter::Only(ItemType::TechDebt)
        );
        assert!(TypeFilter::from_str("story-points").is_err());
        assert!(TypeFilter::Only(ItemType::Bug).matches(ItemType::Bug));
        assert!(!TypeFilter::Only(ItemType::Bug).matches(ItemType::Epic));
    }
}

use crate::output::print_json;
use anyhow::Context;
use atlas_core::item::{BugDetails, Details, EpicDetails, FeatureDetails, NewItem, TechDebtDetails};
use atlas_core::types::{Effort, Level};
use atlas_core::{score, Backlog};
use clap::Args;
use std::path::Path;

#[derive(Args)]
pub struct FeatureArgs {
    /// Feature title
    pub title: Option<String>,
    /// critical | high | medium | low
    #[arg(long)]
    pub priority: Option<String>,
    /// Business value: critical | high | medium | low
    #[arg(long)]
    pub value: Option<String>,
    /// small | medium | large | xl
    #[arg(long)]
    pub effort: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Acceptance criterion (repeatable)
    #[arg(long = "criteria")]
    pub criteria: Vec<String>,
}

#[derive(Args)]
pub struct BugArgs {
    /// Bug title
    pub title: Option<String>,
    /// critical | high | medium | low
    #[arg(long)]
    pub severity: Option<String>,
    /// User impact: critical | high | medium | low
    #[arg(long)]
    pub impact: Option<String>,
    /// Override the priority derived from severity and impact
    #[arg(long)]
    pub priority: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Reproduction step (repeatable)
    #[arg(long = "step")]
    pub steps: Vec<String>,
}

#[derive(Args)]
pub struct TechDebtArgs {
    /// Tech debt title
    pub title: Option<String>,
    /// critical | high | medium | low
    #[arg(long)]
    pub risk: Option<String>,
    /// small | medium | large | xl
    #[arg(long)]
    pub effort: Option<String>,
    /// What happens if this is not addressed
    #[arg(long)]
    pub impact: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct EpicArgs {
    /// Epic title
    pub title: Option<String>,
    /// Business goal; an epic with a goal starts at high priority
    #[arg(long)]
    pub goal: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// Target date, free-form
    #[arg(long)]
    pub target: Option<String>,
    /// Member item reference (repeatable)
    #[arg(long = "feature")]
    pub features: Vec<String>,
}

fn level(input: Option<&str>) -> Level {
    input.map(Level::normalize).unwrap_or_default()
}

fn effort(input: Option<&str>) -> Effort {
    input.map(Effort::normalize).unwrap_or_default()
}

pub fn feature(root: &Path, args: FeatureArgs) -> anyhow::Result<()> {
    let details = Details::Feature(FeatureDetails {
        acceptance_criteria: args.criteria,
        business_value: level(args.value.as_deref()),
        effort: effort(args.effort.as_deref()),
    });
    let new = NewItem::with_details(args.title.unwrap_or_default(), details)
        .description(args.description.unwrap_or_default())
        .priority(level(args.priority.as_deref()));
    create(root, "create_feature", new)
}

pub fn bug(root: &Path, args: BugArgs) -> anyhow::Result<()> {
    let details = Details::Bug(BugDetails {
        severity: level(args.severity.as_deref()),
        user_impact: level(args.impact.as_deref()),
        steps_to_reproduce: args.steps,
    });
    let mut new = NewItem::with_details(args.title.unwrap_or_default(), details)
        .description(args.description.unwrap_or_default());
    if let Some(p) = args.priority.as_deref() {
        new = new.priority(Level::normalize(p));
    }
    create(root, "create_bug", new)
}

pub fn tech_debt(root: &Path, args: TechDebtArgs) -> anyhow::Result<()> {
    let details = Details::TechDebt(TechDebtDetails {
        risk: level(args.risk.as_deref()),
        effort: effort(args.effort.as_deref()),
        impact: args.impact.unwrap_or_default(),
    });
    let new = NewItem::with_details(args.title.unwrap_or_default(), details)
        .description(args.description.unwrap_or_default());
    create(root, "create_tech_debt", new)
}

pub fn epic(root: &Path, args: EpicArgs) -> anyhow::Result<()> {
    let details = Details::Epic(EpicDetails {
        features: args.features,
        business_goal: args.goal.unwrap_or_default(),
        target_date: args.target,
    });
    let new = NewItem::with_details(args.title.unwrap_or_default(), details)
        .description(args.description.unwrap_or_default());
    create(root, "create_epic", new)
}

fn create(root: &Path, action: &str, new: NewItem) -> anyhow::Result<()> {
    let mut backlog = Backlog::open(root).context("failed to load backlog")?;
    let item = backlog.create(new)?;
    tracing::info!(id = %item.id, "created");

    print_json(&serde_json::json!({
        "action": action,
        "priority_score": score::score(&item),
        "item": item,
    }))
}

mod cmd;
mod output;
mod root;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use cmd::create::{BugArgs, EpicArgs, FeatureArgs, TechDebtArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "atlas",
    about = "Backlog manager for agent-driven workflows: features, bugs, tech debt and epics ranked by WSJF-style score",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .atlas/ or .git/)
    #[arg(long, global = true, env = "ATLAS_ROOT")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a feature (F####)
    Feature(FeatureArgs),

    /// Create a bug (B####)
    Bug(BugArgs),

    /// Create a technical debt item (T####)
    #[command(name = "tech_debt", alias = "tech-debt")]
    TechDebt(TechDebtArgs),

    /// Create an epic (E####)
    Epic(EpicArgs),

    /// List items, highest priority score first
    List {
        /// all | feature | bug | tech_debt | epic
        #[arg(default_value = "all")]
        item_type: String,
        /// Only items with this status
        #[arg(long)]
        status: Option<String>,
        /// Show at most N items
        #[arg(long)]
        limit: Option<usize>,
        /// Render a table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Change an item's status
    Update { item_id: String, new_status: String },

    /// Show one item with its score breakdown and artifact
    Show { item_id: String },

    /// Kanban summary grouped by status
    Board {
        /// Render a table instead of JSON
        #[arg(long)]
        table: bool,
    },

    /// Check artifact naming and status consistency
    Check,

    /// Print the scoring tables
    Guide,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => fail(&e.to_string()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = root::resolve_root(cli.root.as_deref());
    tracing::debug!(root = %root.display(), "resolved project root");

    let result = match cli.command {
        Commands::Feature(args) => cmd::create::feature(&root, args),
        Commands::Bug(args) => cmd::create::bug(&root, args),
        Commands::TechDebt(args) => cmd::create::tech_debt(&root, args),
        Commands::Epic(args) => cmd::create::epic(&root, args),
        Commands::List {
            item_type,
            status,
            limit,
            table,
        } => cmd::list::run(&root, &item_type, status.as_deref(), limit, table),
        Commands::Update {
            item_id,
            new_status,
        } => cmd::update::run(&root, &item_id, &new_status),
        Commands::Show { item_id } => cmd::show::run(&root, &item_id),
        Commands::Board { table } => cmd::board::run(&root, table),
        Commands::Check => cmd::check::run(&root),
        Commands::Guide => cmd::guide::run(),
    };

    if let Err(e) = result {
        fail(&format!("{e:#}"));
    }
}

/// Report a failure as a JSON object on stdout, where the calling agent
/// reads results, and exit non-zero.
fn fail(message: &str) -> ! {
    let body = serde_json::json!({ "error": message.trim_end() });
    println!(
        "{}",
        serde_json::to_string_pretty(&body).unwrap_or_else(|_| body.to_string())
    );
    std::process::exit(1);
}

//! Location seeding command

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mobilizer_core::HierarchyLevel;
use mobilizer_locations::{
    DelimitationValidator, InMemoryLocationStore, SeedMode, SeedOutcome, SeedService,
};

use super::check_duplicates::render_report;
use super::{load_records, InputFormat};
use crate::config::CliConfig;
use crate::error::CliResult;

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Delimitation dump to seed from
    pub file: PathBuf,

    /// Input layout (detected from the extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Insert the built nodes instead of only reporting them
    #[arg(long)]
    pub commit: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute seed command
pub async fn execute(args: SeedArgs, config: &CliConfig) -> CliResult<String> {
    let records = load_records(&args.file, args.format)?;
    let mode = if args.commit {
        SeedMode::Commit
    } else {
        SeedMode::DryRun
    };

    let store = Arc::new(InMemoryLocationStore::new());
    let service = SeedService::new(
        store,
        DelimitationValidator::with_max_rows(config.max_import_rows),
    );
    let outcome = service.seed(&records, mode).await?;

    if args.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&outcome)?))
    } else {
        Ok(render_outcome(&outcome))
    }
}

fn render_outcome(outcome: &SeedOutcome) -> String {
    let mut out = render_report(&outcome.report);
    let _ = writeln!(out, "\nHierarchy");
    for level in HierarchyLevel::all() {
        let count = outcome
            .summary
            .nodes_by_level
            .get(level)
            .copied()
            .unwrap_or(0);
        let _ = writeln!(out, "  {:<14} {}", level.as_str(), count);
    }
    let _ = writeln!(
        out,
        "  {:<14} {}",
        "skipped",
        outcome.summary.skipped_duplicates
    );

    match outcome.mode {
        SeedMode::DryRun => {
            let _ = writeln!(out, "\nDry run: nothing written. Pass --commit to insert.");
        }
        SeedMode::Commit => {
            let _ = writeln!(out, "\nInserted {} node(s).", outcome.inserted);
        }
    }
    out
}

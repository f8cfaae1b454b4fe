//! Duplicate delimitation report command

use std::fmt::Write as _;
use std::path::PathBuf;

use clap::Args;
use mobilizer_locations::{DelimitationValidator, DuplicateReport};

use super::{load_records, InputFormat};
use crate::config::CliConfig;
use crate::error::CliResult;

/// Arguments for the check-duplicates command
#[derive(Args, Debug)]
pub struct CheckDuplicatesArgs {
    /// Delimitation dump to inspect
    pub file: PathBuf,

    /// Input layout (detected from the extension when omitted)
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute check-duplicates command. Never writes anything.
pub fn execute(args: CheckDuplicatesArgs, config: &CliConfig) -> CliResult<String> {
    let records = load_records(&args.file, args.format)?;
    let report = DelimitationValidator::with_max_rows(config.max_import_rows).validate(&records)?;

    if args.json {
        Ok(format!("{}\n", report.to_pretty_json()?))
    } else {
        Ok(render_report(&report))
    }
}

/// Human-readable report.
pub fn render_report(report: &DuplicateReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Delimitation report");
    let _ = writeln!(out, "{}", "━".repeat(45));
    let _ = writeln!(out, "Total rows:        {}", report.total_rows);
    let _ = writeln!(out, "Unique values:     {}", report.unique_count);
    let _ = writeln!(out, "Duplicated values: {}", report.duplicate_count);
    let _ = writeln!(out, "Unparseable rows:  {}", report.unparseable_count);

    if !report.duplicates.is_empty() {
        let _ = writeln!(out, "\nDuplicates");
        for dup in &report.duplicates {
            let _ = writeln!(out, "  {:>4}x  {}", dup.count, dup.value);
        }
    }

    if !report.unparseable.is_empty() {
        let _ = writeln!(out, "\nSkipped");
        for row in &report.unparseable {
            let _ = writeln!(out, "  line {}: {}", row.line_number, row.reason);
        }
    }

    if report.is_clean() {
        let _ = writeln!(out, "\nNo duplicates.");
    }
    out
}

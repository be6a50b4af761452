//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, the full audit of an
//! organization.
//!
//! ## Functionality
//!
//! - **Discovery**: lists the organization's repositories and assembles
//!   products from their `.tractusx` metadata.
//! - **Guideline Checks**: clones every product repository and runs the
//!   registered release guidelines on it.
//! - **Reporting**: prints the report as text or JSON, to stdout or a file.
//!   With `--fail-on-violation` the command exits non-zero when any product
//!   failed.
//!
//! Progress is shown on stderr while the run is in flight.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use trg_checks::dashboard::{Dashboard, Progress};
use trg_checks::output::{emoji, render_json, render_report, OutputConfig};
use trg_checks::report::DashboardReport;

use super::OrganizationArgs;

/// Report formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// Check every product of the organization against the release guidelines
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub organization: OrganizationArgs,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write the report to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Exit with an error when any product fails a required guideline.
    #[arg(long)]
    pub fail_on_violation: bool,

    /// Do not show a progress bar.
    #[arg(long)]
    pub no_progress: bool,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    let config = args.organization.to_config()?;
    let dashboard = Dashboard::new(&config)
        .map_err(|e| anyhow::anyhow!("Failed to set up dashboard: {}", e))?;

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        progress_bar()
    };
    progress.set_message(format!("Listing repositories of {}", config.organization));

    let report = dashboard.check_products_with(&|event| advance(&progress, event));
    progress.finish_and_clear();

    let rendered = match args.format {
        Format::Text => render_report(&report, &out),
        Format::Json => render_json(&report)?,
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered).map_err(|e| {
                anyhow::anyhow!("Failed to write report to {}: {}", path.display(), e)
            })?;
            eprintln!(
                "{} Report written to {}",
                emoji(&out, "📝", "[OK]"),
                path.display()
            );
        }
        None => print!("{}", rendered),
    }

    enforce(&report, args.fail_on_violation)
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    // The template is a constant; fall back to the default style if it is
    // ever rejected.
    let style = ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_millis(120));
    bar
}

fn advance(bar: &ProgressBar, event: Progress) {
    match event {
        Progress::Listed { repositories } => {
            bar.set_length(repositories as u64);
            bar.set_position(0);
            bar.set_message("Resolving metadata");
        }
        Progress::MetadataResolved { .. } => bar.inc(1),
        Progress::Assembled {
            products,
            repositories,
        } => {
            bar.set_length(repositories as u64);
            bar.set_position(0);
            bar.set_message(format!("Checking {} products", products));
        }
        Progress::RepositoryChecked { repository, .. } => {
            bar.inc(1);
            bar.set_message(format!("Checked {}", repository));
        }
    }
}

fn enforce(report: &DashboardReport, fail_on_violation: bool) -> Result<()> {
    if fail_on_violation && !report.all_passed() {
        let summary = report.summary();
        anyhow::bail!(
            "{} of {} products failed the release guidelines",
            summary.products - summary.products_passed,
            summary.products
        );
    }
    Ok(())
}

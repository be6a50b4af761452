//! # Inspect Command Implementation
//!
//! This module implements the `inspect` subcommand, which runs the registered
//! release guidelines against a local directory. It is the same pipeline the
//! `check` command runs on each clone, without any network access.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Args;

use trg_checks::checks::GuidelinePipeline;
use trg_checks::metadata;
use trg_checks::output::{emoji, render_repository, OutputConfig};
use trg_checks::product::Repository;

use super::check::Format;

/// Run the release guidelines against a local checkout
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Root of the checkout to inspect.
    #[arg(value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Exit with an error when a required guideline fails.
    #[arg(long)]
    pub fail_on_violation: bool,
}

/// Execute the `inspect` command.
pub fn execute(args: InspectArgs, color_flag: &str) -> Result<()> {
    let out = OutputConfig::from_env_and_flag(color_flag);
    if !args.dir.is_dir() {
        anyhow::bail!("{} is not a directory", args.dir.display());
    }

    let repo = local_repository(&args.dir);
    let checked = GuidelinePipeline::default().run(&repo, &args.dir);

    match args.format {
        Format::Text => {
            println!(
                "{} Inspecting {}",
                emoji(&out, "🔍", "[SCAN]"),
                args.dir.display()
            );
            print!("{}", render_repository(&checked, &out));
        }
        Format::Json => {
            let json = serde_json::to_string_pretty(&checked)?;
            println!("{}", json);
        }
    }

    if args.fail_on_violation && !checked.passed_all_guidelines {
        anyhow::bail!("{} failed the release guidelines", repo.name);
    }
    Ok(())
}

/// Name the checkout after its directory; use the declared leading
/// repository as URL when the checkout is itself the leader, else the path.
fn local_repository(dir: &Path) -> Repository {
    let name = dir
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| dir.display().to_string());

    let url = metadata::from_dir(dir)
        .ok()
        .map(|m| m.leading_repository)
        .filter(|leading| leading.to_lowercase().ends_with(&format!("/{}", name.to_lowercase())))
        .unwrap_or_else(|| dir.display().to_string());

    Repository::new(name, url)
}

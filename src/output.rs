//! # Output Rendering
//!
//! This module controls how results are presented on a terminal and renders
//! dashboard reports as text or JSON.
//!
//! ## Respecting User Preferences
//!
//! Colors and symbols follow these flags and environment variables:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trg_checks::output::{render_report, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("auto");
//! print!("{}", render_report(&report, &config));
//! ```

use std::env;
use std::fmt::Write;

use console::style;

use crate::error::Result;
use crate::report::{CheckedRepository, DashboardReport, GuidelineCheck};

/// Output configuration for controlling colors and symbols.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `--color=always` overrides `NO_COLOR`, `--color=never` turns colors
    /// off, and anything else detects support from the environment.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // The presence of NO_COLOR, even empty, disables colors.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Create a configuration with colors always enabled.
    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    /// Create a configuration with colors always disabled.
    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns the emoji when colors are enabled, the plain text otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

fn verdict(config: &OutputConfig, passed: bool) -> String {
    let text = if passed { "PASSED" } else { "FAILED" };
    if !config.use_color {
        return text.to_string();
    }
    if passed {
        style(text).green().bold().to_string()
    } else {
        style(text).red().bold().to_string()
    }
}

fn check_marker(config: &OutputConfig, check: &GuidelineCheck) -> &'static str {
    match (check.passed, check.optional) {
        (true, _) => emoji(config, "✅", "[ok]  "),
        (false, true) => emoji(config, "⚠️ ", "[warn]"),
        (false, false) => emoji(config, "❌", "[fail]"),
    }
}

/// Render the guideline outcomes of one repository.
pub fn render_repository(repo: &CheckedRepository, config: &OutputConfig) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "  {} {} ({})",
        verdict(config, repo.passed_all_guidelines),
        repo.repo_name,
        repo.repo_url
    );
    for check in &repo.guideline_checks {
        let _ = write!(out, "    {} {}", check_marker(config, check), check.guideline_name);
        if check.optional {
            out.push_str(" (optional)");
        }
        out.push('\n');
        if !check.passed && !check.error_description.is_empty() {
            let _ = writeln!(out, "         {}", check.error_description);
            let _ = writeln!(out, "         see {}", check.guideline_url);
        }
    }
    out
}

/// Render a full report as human-readable text.
pub fn render_report(report: &DashboardReport, config: &OutputConfig) -> String {
    let mut out = String::new();

    for product in &report.checked_products {
        let name = if product.name.is_empty() {
            "<unnamed product>"
        } else {
            product.name.as_str()
        };
        let _ = writeln!(
            out,
            "{} {} {}",
            emoji(config, "📦", "Product"),
            name,
            verdict(config, product.overall_passed)
        );
        if !product.leading_repo.is_empty() {
            let _ = writeln!(out, "  leading repository: {}", product.leading_repo);
        }
        for repo in &product.checked_repositories {
            out.push_str(&render_repository(repo, config));
        }
        out.push('\n');
    }

    if !report.unhandled_repositories.is_empty() {
        let _ = writeln!(
            out,
            "Repositories without product metadata ({}):",
            report.unhandled_repositories.len()
        );
        for repo in &report.unhandled_repositories {
            let _ = writeln!(out, "  - {} ({})", repo.name, repo.url);
        }
        out.push('\n');
    }

    let summary = report.summary();
    let _ = writeln!(
        out,
        "{} products passed, {} repositories passed, {} unhandled",
        format_args!("{}/{}", summary.products_passed, summary.products),
        format_args!("{}/{}", summary.repositories_passed, summary.repositories),
        summary.unhandled
    );
    out
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &DashboardReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `trg-checks` command-line tool, one file per subcommand.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the global color
//!   flag, and calls into the `trg_checks` library to do the work.
//!
//! Commands that talk to GitHub share `OrganizationArgs`, which turns into a
//! validated `trg_checks::config::Config`.

pub mod check;
pub mod inspect;
pub mod products;

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use trg_checks::config::{
    Config, DEFAULT_API_URL, DEFAULT_ORGANIZATION, MAX_PER_PAGE, TOKEN_ENV_VAR,
};

/// Which organization to audit and how to reach it.
#[derive(Args, Debug, Clone)]
pub struct OrganizationArgs {
    /// The GitHub organization whose public repositories are audited.
    #[arg(long, value_name = "ORG", env = "TRG_ORG", default_value = DEFAULT_ORGANIZATION)]
    pub org: String,

    /// Base URL of the GitHub REST API.
    #[arg(long, value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// GitHub token used as bearer authentication.
    ///
    /// Unauthenticated requests are heavily rate limited.
    #[arg(long, value_name = "TOKEN", env = TOKEN_ENV_VAR, hide_env_values = true)]
    pub token: Option<String>,

    /// Number of repositories requested per listing page (1-100).
    #[arg(long, value_name = "NUM", default_value_t = MAX_PER_PAGE)]
    pub per_page: u32,

    /// Number of repositories processed concurrently.
    #[arg(short, long, value_name = "NUM", default_value_t = 4)]
    pub jobs: usize,

    /// Timeout in seconds for each GitHub API request.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub request_timeout: u64,

    /// Timeout in seconds for each repository clone.
    #[arg(long, value_name = "SECS", default_value_t = 300)]
    pub clone_timeout: u64,
}

impl OrganizationArgs {
    /// Build and validate the run configuration.
    pub fn to_config(&self) -> Result<Config> {
        let config = Config {
            organization: self.org.clone(),
            api_url: self.api_url.clone(),
            token: None,
            per_page: self.per_page,
            jobs: self.jobs,
            request_timeout: Duration::from_secs(self.request_timeout),
            clone_timeout: Duration::from_secs(self.clone_timeout),
        }
        .with_token(self.token.clone());

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid configuration: {}", e))?;
        Ok(config)
    }
}

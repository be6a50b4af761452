//! # Run Configuration
//!
//! This module defines `Config`, the settings for one dashboard run: which
//! GitHub organization to audit, where the API lives, how to authenticate,
//! and how much work may run at once.
//!
//! A `Config` is built once at startup (usually by the CLI) and then passed
//! by reference to the components that need it. The library never reads the
//! environment itself.

use std::time::Duration;

use crate::error::{Error, Result};

/// Organization audited when none is given.
pub const DEFAULT_ORGANIZATION: &str = "eclipse-tractusx";

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Environment variable holding an optional bearer token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_ACCESS_TOKEN";

/// Largest page size accepted by the GitHub listing endpoints.
pub const MAX_PER_PAGE: u32 = 100;

/// Settings for one dashboard run.
#[derive(Debug, Clone)]
pub struct Config {
    /// The GitHub organization whose public repositories are audited.
    pub organization: String,
    /// Base URL of the GitHub REST API.
    pub api_url: String,
    /// Optional bearer token. Requests are unauthenticated when absent.
    pub token: Option<String>,
    /// Page size used while listing repositories.
    pub per_page: u32,
    /// Number of worker threads for metadata fetches and check pipelines.
    pub jobs: usize,
    /// Deadline applied to every API request.
    pub request_timeout: Duration,
    /// Deadline applied to every repository clone.
    pub clone_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            per_page: MAX_PER_PAGE,
            jobs: 4,
            request_timeout: Duration::from_secs(30),
            clone_timeout: Duration::from_secs(300),
        }
    }
}

impl Config {
    /// Replace the token, treating an empty string as "no token".
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = normalize_token(token);
        self
    }

    /// Check that every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if self.organization.trim().is_empty() {
            return Err(Error::Config {
                message: "organization must not be empty".to_string(),
            });
        }

        url::Url::parse(&self.api_url).map_err(|e| Error::Config {
            message: format!("invalid API URL '{}': {}", self.api_url, e),
        })?;

        if self.per_page == 0 || self.per_page > MAX_PER_PAGE {
            return Err(Error::Config {
                message: format!(
                    "per-page must be between 1 and {}, got {}",
                    MAX_PER_PAGE, self.per_page
                ),
            });
        }

        if self.jobs == 0 {
            return Err(Error::Config {
                message: "jobs must be at least 1".to_string(),
            });
        }

        if self.request_timeout.is_zero() || self.clone_timeout.is_zero() {
            return Err(Error::Config {
                message: "timeouts must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn normalize_token(token: Option<String>) -> Option<String> {
    token
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}

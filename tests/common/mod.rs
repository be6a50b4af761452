//! Shared test utilities for integration and E2E tests.
//!
//! This module provides checkout fixtures, canned metadata, and mock GitHub
//! and git back ends, so that whole dashboard runs can be tested offline.
//!
//! ## Usage
//!
//! Add `mod common;` to your test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new().with_compliant_layout();
//!     fixture.command().arg("inspect").arg(fixture.path()).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::collections::{HashMap, HashSet};
use std::env;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use trg_checks::error::{Error, Result};
use trg_checks::github::{GitHubApi, Page};
use trg_checks::product::Repository;
use trg_checks::repository::GitOperations;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::metadata;
    #[allow(unused_imports)]
    pub use super::should_skip_network_tests;
    pub use super::TestFixture;
}

/// `.tractusx` snippets for testing.
#[allow(dead_code)]
pub mod metadata {
    /// Metadata of the leading repository of the "Portal" product.
    pub const PORTAL_LEADER: &str = "product: Portal
leadingRepository: https://github.com/eclipse-tractusx/portal
repositories:
  - name: portal-iam
    usage: identity and access management
    url: https://github.com/eclipse-tractusx/portal-iam
";

    /// Metadata of a member repository of the "Portal" product.
    pub const PORTAL_MEMBER: &str = "product: Portal IAM
leadingRepository: https://github.com/eclipse-tractusx/portal
";

    /// Metadata without a leading repository.
    pub const NO_LEADER: &str = "product: Lonely\n";

    /// Not YAML at all.
    pub const MALFORMED: &str = "product: [unclosed";

    /// Metadata declaring `leader` as the leading repository of `product`.
    pub fn declaring(product: &str, leader: &str) -> String {
        format!("product: {}\nleadingRepository: {}\n", product, leader)
    }
}

/// Check if network tests should be skipped.
///
/// Returns `true` if the `SKIP_NETWORK_TESTS` environment variable is set.
#[allow(dead_code)]
pub fn should_skip_network_tests() -> bool {
    env::var("SKIP_NETWORK_TESTS").is_ok()
}

/// A temporary directory standing in for a repository checkout.
///
/// # Example
///
/// ```rust,ignore
/// let fixture = TestFixture::new()
///     .with_file("README.md", "# Portal")
///     .with_file(".tractusx", metadata::PORTAL_LEADER);
/// ```
#[allow(dead_code)]
pub struct TestFixture {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Add every file the required guidelines look for.
    #[allow(dead_code)]
    pub fn with_compliant_layout(self) -> Self {
        self.with_file("README.md", "# Portal")
            .with_file("CHANGELOG.md", "# Changelog")
            .with_file(".tractusx", metadata::PORTAL_LEADER)
            .with_file("Dockerfile", "FROM eclipse-temurin:17-jre\n")
    }

    /// Get the path to the temporary directory.
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Create a child path in the temp directory.
    #[allow(dead_code)]
    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Create a command configured to run in this fixture's directory.
    #[allow(dead_code)]
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("trg-checks");
        cmd.current_dir(self.path());
        cmd.env_remove("GITHUB_ACCESS_TOKEN");
        cmd.env_remove("TRG_ORG");
        cmd.env_remove("RUST_LOG");
        cmd
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock GitHub API serving paginated listings and metadata files.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockGitHubApi {
    pub pages: Vec<Vec<Repository>>,
    /// Raw `.tractusx` content keyed by repository name.
    pub files: HashMap<String, Vec<u8>>,
    /// Repositories whose content fetch fails with a transport error.
    pub unreachable: HashSet<String>,
    /// Page whose request fails.
    pub fail_on_page: Option<u32>,
}

#[allow(dead_code)]
impl MockGitHubApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `repos` on pages of `per_page` entries.
    pub fn with_repositories(mut self, repos: Vec<Repository>, per_page: usize) -> Self {
        self.pages = repos.chunks(per_page.max(1)).map(|c| c.to_vec()).collect();
        self
    }

    pub fn with_metadata(mut self, repo: &str, content: &str) -> Self {
        self.files
            .insert(repo.to_string(), content.as_bytes().to_vec());
        self
    }
}

impl GitHubApi for MockGitHubApi {
    fn list_org_repositories(
        &self,
        org: &str,
        page: u32,
        _per_page: u32,
    ) -> Result<Page<Repository>> {
        if self.fail_on_page == Some(page) {
            return Err(Error::Api {
                url: format!("https://api.github.com/orgs/{}/repos", org),
                status: 502,
                message: "Bad Gateway".to_string(),
            });
        }
        let index = (page as usize).saturating_sub(1);
        Ok(Page {
            items: self.pages.get(index).cloned().unwrap_or_default(),
            next_page: if index + 1 < self.pages.len() {
                Some(page + 1)
            } else {
                None
            },
        })
    }

    fn get_file_content(&self, owner: &str, repo: &str, _path: &str) -> Result<Option<Vec<u8>>> {
        if self.unreachable.contains(repo) {
            return Err(Error::Transport {
                url: format!("https://api.github.com/repos/{}/{}", owner, repo),
                message: "operation timed out".to_string(),
            });
        }
        Ok(self.files.get(repo).cloned())
    }
}

/// Mock git that materializes a checkout from canned files per URL.
#[allow(dead_code)]
#[derive(Default)]
pub struct MockGitOperations {
    /// Files written into the checkout, keyed by repository URL.
    pub checkouts: HashMap<String, Vec<(String, String)>>,
    /// URLs whose clone fails.
    pub failing: HashSet<String>,
    /// Every checkout directory handed to `clone_shallow`.
    pub targets: Arc<Mutex<Vec<std::path::PathBuf>>>,
}

#[allow(dead_code)]
impl MockGitOperations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_checkout(mut self, url: &str, files: &[(&str, &str)]) -> Self {
        self.checkouts.insert(
            url.to_string(),
            files
                .iter()
                .map(|(path, content)| (path.to_string(), content.to_string()))
                .collect(),
        );
        self
    }

    pub fn failing_for(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }
}

impl GitOperations for MockGitOperations {
    fn clone_shallow(&self, url: &str, target_dir: &Path) -> Result<()> {
        self.targets
            .lock()
            .expect("targets lock poisoned")
            .push(target_dir.to_path_buf());
        if self.failing.contains(url) {
            return Err(Error::GitClone {
                url: url.to_string(),
                message: "remote: Repository not found.".to_string(),
                hint: None,
            });
        }

        fs::create_dir_all(target_dir)?;
        for (path, content) in self.checkouts.get(url).into_iter().flatten() {
            let file = target_dir.join(path);
            if let Some(parent) = file.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(file, content)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixture_creates_temp_dir() {
        let fixture = TestFixture::new();
        assert!(fixture.path().exists());
    }

    #[test]
    fn test_fixture_with_file() {
        let fixture = TestFixture::new().with_file("charts/app/Chart.yaml", "apiVersion: v2");
        assert!(fixture.path().join("charts/app/Chart.yaml").exists());
    }

    #[test]
    fn test_metadata_snippets_parse() {
        for snippet in [metadata::PORTAL_LEADER, metadata::PORTAL_MEMBER, metadata::NO_LEADER] {
            trg_checks::metadata::parse(snippet.as_bytes()).expect("snippet should parse");
        }
        assert!(trg_checks::metadata::parse(metadata::MALFORMED.as_bytes()).is_err());
    }

    #[test]
    fn test_mock_api_paginates() {
        let repos: Vec<_> = (0..5)
            .map(|i| Repository::new(format!("r{}", i), format!("https://github.com/org/r{}", i)))
            .collect();
        let api = MockGitHubApi::new().with_repositories(repos, 2);

        let first = api.list_org_repositories("org", 1, 2).unwrap();
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.next_page, Some(2));
        let last = api.list_org_repositories("org", 3, 2).unwrap();
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.next_page, None);
    }
}

//! # Repository Checkouts
//!
//! This module provides the `RepositoryCloner`, which checks a repository out
//! into a fresh temporary directory so that the guideline checks can inspect
//! its files.
//!
//! ## Design
//!
//! Cloning goes through the `GitOperations` trait. In the main application,
//! `DefaultGitOperations` wraps the system `git` command; in tests it is
//! replaced with mock implementations that write fixture files instead of
//! touching the network.
//!
//! Every checkout is owned by a `Checkout` value holding a
//! `tempfile::TempDir`. The directory is removed when the `Checkout` is
//! dropped, on every exit path of the code using it, including early returns
//! and panics.

use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use tempfile::TempDir;

use crate::error::Result;
use crate::product::Repository;

/// Trait for git operations - allows mocking in tests
pub trait GitOperations: Send + Sync {
    /// Clones the default branch of a repository into `target_dir`.
    ///
    /// This is expected to be a shallow clone to optimize for speed and disk
    /// space.
    fn clone_shallow(&self, url: &str, target_dir: &Path) -> Result<()>;
}

/// The default implementation of `GitOperations`, which uses the system's
/// `git` command to perform real Git operations.
pub struct DefaultGitOperations {
    timeout: Duration,
}

impl DefaultGitOperations {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl GitOperations for DefaultGitOperations {
    fn clone_shallow(&self, url: &str, target_dir: &Path) -> Result<()> {
        crate::git::clone_shallow(url, target_dir, self.timeout)
    }
}

/// A repository checked out into a temporary directory.
///
/// The directory is deleted when this value is dropped.
#[derive(Debug)]
pub struct Checkout {
    // Kept alive for its Drop.
    _temp_dir: TempDir,
    path: PathBuf,
}

impl Checkout {
    /// The root of the working tree.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Clones repositories into scoped temporary directories.
pub struct RepositoryCloner {
    git_ops: Box<dyn GitOperations>,
}

impl RepositoryCloner {
    /// Creates a cloner using the system `git` command, bounded by `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            git_ops: Box::new(DefaultGitOperations::new(timeout)),
        }
    }

    /// Creates a cloner with a custom `GitOperations` implementation.
    pub fn with_operations(git_ops: Box<dyn GitOperations>) -> Self {
        Self { git_ops }
    }

    /// Clones `repo` into a fresh temporary directory.
    ///
    /// On failure the temporary directory has already been removed.
    pub fn checkout(&self, repo: &Repository) -> Result<Checkout> {
        let temp_dir = tempfile::Builder::new().prefix("trg-checks-").tempdir()?;
        // git creates the target itself; cloning into a subdirectory keeps the
        // TempDir root under our control.
        let path = temp_dir.path().join(sanitize_dir_name(&repo.name));

        debug!("Checking out {} into {}", repo.url, path.display());
        self.git_ops.clone_shallow(&repo.url, &path)?;

        Ok(Checkout {
            _temp_dir: temp_dir,
            path,
        })
    }
}

/// Make a repository name safe to use as a single path component.
fn sanitize_dir_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.trim_matches('.') {
        "" => "repo".to_string(),
        _ => cleaned,
    }
}

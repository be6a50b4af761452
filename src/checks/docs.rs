//! Documentation guidelines (TRG 1.x): required top-level documents.

use std::path::{Path, PathBuf};

use super::{QualityGuideline, TestResult};

pub const README_GUIDELINE: &str = "TRG 1.01 - README.md";
pub const INSTALL_GUIDELINE: &str = "TRG 1.02 - INSTALL.md";
pub const CHANGELOG_GUIDELINE: &str = "TRG 1.03 - CHANGELOG.md";

const README_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-1/trg-1-1";
const INSTALL_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-1/trg-1-2";
const CHANGELOG_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-1/trg-1-3";

/// Tests that `file` exists as a regular file at the root of `dir`.
fn document_exists(dir: &Path, file: &str, guideline: &str) -> TestResult {
    let path = dir.join(file);
    match path.metadata() {
        Ok(meta) if meta.is_file() => TestResult::pass(),
        Ok(_) => TestResult::fail(format!("{} exists but is not a regular file", file)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            TestResult::fail(format!("Did not find a {} file in the repository root", file))
        }
        Err(e) => TestResult::from_error(guideline, e),
    }
}

/// The repository has a `README.md`.
pub struct ReadmeExists {
    dir: PathBuf,
}

impl ReadmeExists {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }
}

impl QualityGuideline for ReadmeExists {
    fn test(&self) -> TestResult {
        document_exists(&self.dir, "README.md", README_GUIDELINE)
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        README_GUIDELINE
    }

    fn external_description(&self) -> &str {
        README_URL
    }
}

/// The repository has an `INSTALL.md`. Optional, since installation notes
/// may live in the README.
pub struct InstallExists {
    dir: PathBuf,
}

impl InstallExists {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }
}

impl QualityGuideline for InstallExists {
    fn test(&self) -> TestResult {
        document_exists(&self.dir, "INSTALL.md", INSTALL_GUIDELINE)
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn name(&self) -> &str {
        INSTALL_GUIDELINE
    }

    fn external_description(&self) -> &str {
        INSTALL_URL
    }
}

/// The repository has a `CHANGELOG.md`.
pub struct ChangelogExists {
    dir: PathBuf,
}

impl ChangelogExists {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }
}

impl QualityGuideline for ChangelogExists {
    fn test(&self) -> TestResult {
        document_exists(&self.dir, "CHANGELOG.md", CHANGELOG_GUIDELINE)
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        CHANGELOG_GUIDELINE
    }

    fn external_description(&self) -> &str {
        CHANGELOG_URL
    }
}

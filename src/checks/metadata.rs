//! TRG 2.05: the repository declares its product in `.tractusx`.

use std::path::{Path, PathBuf};

use super::{QualityGuideline, TestResult};
use crate::error::Error;
use crate::metadata::{self, METADATA_FILE};

pub const METADATA_GUIDELINE: &str = "TRG 2.05 - .tractusx metadata";

const METADATA_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-2/trg-2-5";

/// The `.tractusx` file exists, parses, and names a leading repository.
pub struct LeadingRepositoryDefined {
    dir: PathBuf,
}

impl LeadingRepositoryDefined {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }
}

impl QualityGuideline for LeadingRepositoryDefined {
    fn test(&self) -> TestResult {
        match metadata::from_dir(&self.dir) {
            Ok(metadata) if metadata.leading_repository.trim().is_empty() => TestResult::fail(
                format!("{} does not define a leadingRepository", METADATA_FILE),
            ),
            Ok(_) => TestResult::pass(),
            Err(Error::MetadataNotFound { .. }) => TestResult::fail(format!(
                "Did not find a {} metadata file in the repository root",
                METADATA_FILE
            )),
            Err(Error::MetadataParse { message }) => {
                TestResult::fail(format!("Could not parse {}: {}", METADATA_FILE, message))
            }
            Err(e) => TestResult::from_error(METADATA_GUIDELINE, e),
        }
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        METADATA_GUIDELINE
    }

    fn external_description(&self) -> &str {
        METADATA_URL
    }
}

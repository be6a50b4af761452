//! # Guideline Checks
//!
//! This module runs the Tractus-X release guidelines against a checked-out
//! repository.
//!
//! ## Key Components
//!
//! - **`QualityGuideline`**: the capability set every guideline implements:
//!   run the test, say whether it is optional, and describe itself.
//! - **`GuidelinePipeline`**: a fixed, ordered list of guideline constructors.
//!   `run` binds each guideline to a checkout directory, tests them in order,
//!   and folds the outcomes into a `CheckedRepository`.
//!
//! A repository passes when every non-optional guideline passes. Optional
//! guidelines are recorded but never fail a repository.
//!
//! Adding a guideline means implementing `QualityGuideline` and registering
//! its constructor in `REGISTERED_GUIDELINES`; the pipeline itself does not
//! change.

pub mod container;
pub mod docs;
pub mod helm;
pub mod metadata;

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use log::{debug, info, warn};

use crate::error::Error;
use crate::product::Repository;
use crate::report::{CheckedRepository, GuidelineCheck};

/// Result of testing one guideline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResult {
    pub passed: bool,
    pub error_description: String,
}

impl TestResult {
    pub fn pass() -> Self {
        Self {
            passed: true,
            error_description: String::new(),
        }
    }

    pub fn fail(description: impl Into<String>) -> Self {
        Self {
            passed: false,
            error_description: description.into(),
        }
    }

    /// A check that could not complete fails with the reason.
    pub fn from_error(check: &str, error: impl fmt::Display) -> Self {
        let error = Error::CheckExecution {
            check: check.to_string(),
            message: error.to_string(),
        };
        Self::fail(error.to_string())
    }
}

/// A single release guideline, bound to one checkout directory.
pub trait QualityGuideline {
    /// Test the checkout against this guideline.
    fn test(&self) -> TestResult;

    /// Whether a failure of this guideline is tolerated.
    fn is_optional(&self) -> bool;

    /// Human-readable guideline name.
    fn name(&self) -> &str;

    /// Link to the guideline's documentation.
    fn external_description(&self) -> &str;
}

/// Binds a guideline to a checkout directory.
pub type GuidelineConstructor = fn(&Path) -> Box<dyn QualityGuideline>;

/// The guidelines checked for every repository, in execution order.
///
/// The repository-structure guideline (TRG 2.03) is not registered.
pub const REGISTERED_GUIDELINES: &[GuidelineConstructor] = &[
    docs::ReadmeExists::boxed,
    docs::InstallExists::boxed,
    docs::ChangelogExists::boxed,
    metadata::LeadingRepositoryDefined::boxed,
    container::AllowedBaseImage::boxed,
    helm::HelmStructureExists::boxed,
];

/// Runs a fixed list of guidelines against a checkout.
#[derive(Clone)]
pub struct GuidelinePipeline {
    constructors: Vec<GuidelineConstructor>,
}

impl Default for GuidelinePipeline {
    fn default() -> Self {
        Self::with_guidelines(REGISTERED_GUIDELINES.to_vec())
    }
}

impl fmt::Debug for GuidelinePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GuidelinePipeline")
            .field("guidelines", &self.constructors.len())
            .finish()
    }
}

impl GuidelinePipeline {
    /// Create a pipeline with a custom guideline list.
    pub fn with_guidelines(constructors: Vec<GuidelineConstructor>) -> Self {
        Self { constructors }
    }

    /// Instantiate the registered guidelines for `dir`, in order.
    pub fn guidelines_for_directory(&self, dir: &Path) -> Vec<Box<dyn QualityGuideline>> {
        self.constructors.iter().map(|new| new(dir)).collect()
    }

    /// Test every guideline against the checkout of `repo` at `dir`.
    pub fn run(&self, repo: &Repository, dir: &Path) -> CheckedRepository {
        info!("Starting checks for repository {}", repo.name);
        let mut checked = CheckedRepository::new(repo);

        for guideline in self.guidelines_for_directory(dir) {
            let result = test_contained(guideline.as_ref());
            debug!(
                "{}: {} {}",
                repo.name,
                guideline.name(),
                if result.passed { "passed" } else { "failed" }
            );

            checked.record(GuidelineCheck {
                passed: result.passed,
                optional: guideline.is_optional(),
                error_description: result.error_description,
                guideline_url: guideline.external_description().to_string(),
                guideline_name: guideline.name().to_string(),
            });
        }

        checked
    }
}

/// Run one guideline, turning a panic into a failing result.
fn test_contained(guideline: &dyn QualityGuideline) -> TestResult {
    panic::catch_unwind(AssertUnwindSafe(|| guideline.test())).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        warn!("Guideline {} panicked: {}", guideline.name(), message);
        TestResult::from_error(guideline.name(), format!("panicked: {}", message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

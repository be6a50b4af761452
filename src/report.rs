//! Result records produced by a dashboard run.

use serde::{Deserialize, Serialize};

use crate::product::Repository;

/// Guideline name recorded when a repository could not be cloned.
pub const CLONE_GUIDELINE_NAME: &str = "Repository clone";

/// The outcome of one guideline check on one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidelineCheck {
    pub passed: bool,
    pub optional: bool,
    pub error_description: String,
    pub guideline_url: String,
    pub guideline_name: String,
}

impl GuidelineCheck {
    /// Whether this outcome fails its repository.
    pub fn is_blocking_failure(&self) -> bool {
        !self.passed && !self.optional
    }
}

/// All guideline outcomes of one repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedRepository {
    pub repo_url: String,
    pub repo_name: String,
    pub passed_all_guidelines: bool,
    pub guideline_checks: Vec<GuidelineCheck>,
}

impl CheckedRepository {
    /// Start a record for `repo` with no checks; it passes until a
    /// non-optional check fails.
    pub fn new(repo: &Repository) -> Self {
        Self {
            repo_url: repo.url.clone(),
            repo_name: repo.name.clone(),
            passed_all_guidelines: true,
            guideline_checks: Vec::new(),
        }
    }

    /// Record for a repository whose checks could not run because it could
    /// not be cloned.
    pub fn clone_failure(repo: &Repository, error: impl std::fmt::Display) -> Self {
        Self {
            repo_url: repo.url.clone(),
            repo_name: repo.name.clone(),
            passed_all_guidelines: false,
            guideline_checks: vec![GuidelineCheck {
                passed: false,
                optional: false,
                error_description: format!("Could not clone repository: {}", error),
                guideline_url: repo.url.clone(),
                guideline_name: CLONE_GUIDELINE_NAME.to_string(),
            }],
        }
    }

    /// Append a check outcome and fold it into the overall result.
    pub fn record(&mut self, check: GuidelineCheck) {
        self.passed_all_guidelines = self.passed_all_guidelines && (check.passed || check.optional);
        self.guideline_checks.push(check);
    }
}

/// The checked repositories of one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedProduct {
    pub name: String,
    pub leading_repo: String,
    pub overall_passed: bool,
    pub checked_repositories: Vec<CheckedRepository>,
}

impl CheckedProduct {
    pub fn new(name: impl Into<String>, leading_repo: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            leading_repo: leading_repo.into(),
            overall_passed: true,
            checked_repositories: Vec::new(),
        }
    }

    /// Append a repository and fold its result into the product's.
    pub fn add_repository(&mut self, repo: CheckedRepository) {
        self.overall_passed = self.overall_passed && repo.passed_all_guidelines;
        self.checked_repositories.push(repo);
    }
}

/// Everything a run produced: the checked products, and the repositories
/// that declare no product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub checked_products: Vec<CheckedProduct>,
    pub unhandled_repositories: Vec<Repository>,
}

/// Counters summarizing a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub products: usize,
    pub products_passed: usize,
    pub repositories: usize,
    pub repositories_passed: usize,
    pub unhandled: usize,
}

impl DashboardReport {
    pub fn summary(&self) -> ReportSummary {
        let repositories = self
            .checked_products
            .iter()
            .flat_map(|p| &p.checked_repositories);
        ReportSummary {
            products: self.checked_products.len(),
            products_passed: self
                .checked_products
                .iter()
                .filter(|p| p.overall_passed)
                .count(),
            repositories: repositories.clone().count(),
            repositories_passed: repositories.filter(|r| r.passed_all_guidelines).count(),
            unhandled: self.unhandled_repositories.len(),
        }
    }

    /// Whether every checked product passed.
    pub fn all_passed(&self) -> bool {
        self.checked_products.iter().all(|p| p.overall_passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(passed: bool, optional: bool) -> GuidelineCheck {
        GuidelineCheck {
            passed,
            optional,
            guideline_name: "guideline".to_string(),
            ..GuidelineCheck::default()
        }
    }

    fn repo(name: &str) -> Repository {
        Repository::new(name, format!("https://github.com/org/{}", name))
    }

    #[test]
    fn test_failed_optional_check_does_not_fail_repository() {
        let mut checked = CheckedRepository::new(&repo("a"));
        checked.record(check(true, false));
        checked.record(check(true, false));
        checked.record(check(true, false));
        checked.record(check(false, true));

        assert!(checked.passed_all_guidelines);
        assert_eq!(checked.guideline_checks.len(), 4);
    }

    #[test]
    fn test_failed_required_check_fails_repository_and_product() {
        let mut checked = CheckedRepository::new(&repo("a"));
        checked.record(check(false, false));
        checked.record(check(true, false));
        assert!(!checked.passed_all_guidelines);

        let mut product = CheckedProduct::new("P", "https://github.com/org/a");
        let mut passing = CheckedRepository::new(&repo("b"));
        passing.record(check(true, false));
        product.add_repository(passing);
        assert!(product.overall_passed);
        product.add_repository(checked);
        assert!(!product.overall_passed);
    }

    #[test]
    fn test_repository_without_checks_passes() {
        assert!(CheckedRepository::new(&repo("a")).passed_all_guidelines);
    }

    #[test]
    fn test_clone_failure_keeps_error_detail() {
        let checked = CheckedRepository::clone_failure(&repo("a"), "Repository not found");

        assert_eq!(checked.repo_name, "a");
        assert_eq!(checked.repo_url, "https://github.com/org/a");
        assert!(!checked.passed_all_guidelines);
        assert_eq!(checked.guideline_checks.len(), 1);
        let record = &checked.guideline_checks[0];
        assert_eq!(record.guideline_name, CLONE_GUIDELINE_NAME);
        assert!(record.is_blocking_failure());
        assert!(record.error_description.contains("Repository not found"));
    }

    #[test]
    fn test_summary_counts() {
        let mut good = CheckedProduct::new("Good", "g");
        good.add_repository(CheckedRepository::new(&repo("g")));
        let mut bad = CheckedProduct::new("Bad", "b");
        bad.add_repository(CheckedRepository::new(&repo("b1")));
        bad.add_repository(CheckedRepository::clone_failure(&repo("b2"), "boom"));

        let report = DashboardReport {
            checked_products: vec![bad, good],
            unhandled_repositories: vec![repo("u")],
        };

        let summary = report.summary();
        assert_eq!(summary.products, 2);
        assert_eq!(summary.products_passed, 1);
        assert_eq!(summary.repositories, 3);
        assert_eq!(summary.repositories_passed, 2);
        assert_eq!(summary.unhandled, 1);
        assert!(!report.all_passed());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = DashboardReport {
            checked_products: vec![CheckedProduct::new("P", "https://github.com/org/p")],
            unhandled_repositories: vec![],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["checked_products"][0]["name"], "P");
        assert_eq!(json["checked_products"][0]["overall_passed"], true);
    }
}

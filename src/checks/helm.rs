//! TRG 5.02: Helm charts follow the expected layout.

use std::fs;
use std::path::{Path, PathBuf};

use super::{QualityGuideline, TestResult};
use crate::error::Result;

pub const HELM_GUIDELINE: &str = "TRG 5.02 - Helm structure";

const HELM_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-5/trg-5-02";

/// Directory holding one subdirectory per chart.
pub const CHARTS_DIR: &str = "charts";

/// Files every chart directory must contain.
pub const REQUIRED_CHART_FILES: &[&str] =
    &["Chart.yaml", "values.yaml", "README.md", "LICENSE", ".helmignore"];

/// Directories every chart directory must contain.
pub const REQUIRED_CHART_DIRS: &[&str] = &["templates"];

/// Every chart below `charts/` has the required files and directories.
///
/// A repository without a `charts/` directory ships no chart and passes.
pub struct HelmStructureExists {
    dir: PathBuf,
}

impl HelmStructureExists {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }

    /// Chart directories, sorted by name.
    fn charts(&self) -> Result<Vec<PathBuf>> {
        let charts_dir = self.dir.join(CHARTS_DIR);
        if !charts_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut charts = Vec::new();
        for entry in fs::read_dir(&charts_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                charts.push(entry.path());
            }
        }
        charts.sort();
        Ok(charts)
    }

    fn problems(&self) -> Result<Vec<String>> {
        let mut problems = Vec::new();
        for chart in self.charts()? {
            let missing: Vec<&str> = REQUIRED_CHART_FILES
                .iter()
                .filter(|file| !chart.join(file).is_file())
                .chain(
                    REQUIRED_CHART_DIRS
                        .iter()
                        .filter(|dir| !chart.join(dir).is_dir()),
                )
                .copied()
                .collect();

            if !missing.is_empty() {
                let name = chart
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                problems.push(format!(
                    "chart '{}' is missing {}",
                    name,
                    missing.join(", ")
                ));
            }
        }
        Ok(problems)
    }
}

impl QualityGuideline for HelmStructureExists {
    fn test(&self) -> TestResult {
        match self.problems() {
            Ok(problems) if problems.is_empty() => TestResult::pass(),
            Ok(problems) => TestResult::fail(format!(
                "Helm chart structure incomplete: {}",
                problems.join("; ")
            )),
            Err(e) => TestResult::from_error(HELM_GUIDELINE, e),
        }
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        HELM_GUIDELINE
    }

    fn external_description(&self) -> &str {
        HELM_URL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn complete_chart(root: &Path, name: &str) {
        let chart = root.join(CHARTS_DIR).join(name);
        fs::create_dir_all(chart.join("templates")).unwrap();
        for file in REQUIRED_CHART_FILES {
            fs::write(chart.join(file), "").unwrap();
        }
    }

    #[test]
    fn test_no_charts_directory_passes() {
        let temp = TempDir::new().unwrap();
        assert!(HelmStructureExists::new(temp.path()).test().passed);
    }

    #[test]
    fn test_complete_charts_pass() {
        let temp = TempDir::new().unwrap();
        complete_chart(temp.path(), "portal");
        complete_chart(temp.path(), "portal-backend");

        assert!(HelmStructureExists::new(temp.path()).test().passed);
    }

    #[test]
    fn test_incomplete_chart_fails() {
        let temp = TempDir::new().unwrap();
        complete_chart(temp.path(), "good");
        let bad = temp.path().join(CHARTS_DIR).join("bad");
        fs::create_dir_all(&bad).unwrap();
        fs::write(bad.join("Chart.yaml"), "apiVersion: v2").unwrap();

        let result = HelmStructureExists::new(temp.path()).test();

        assert!(!result.passed);
        assert!(result.error_description.contains("chart 'bad'"));
        assert!(result.error_description.contains("values.yaml"));
        assert!(result.error_description.contains("templates"));
        assert!(!result.error_description.contains("chart 'good'"));
    }

    #[test]
    fn test_templates_must_be_directory() {
        let temp = TempDir::new().unwrap();
        complete_chart(temp.path(), "portal");
        let templates = temp.path().join(CHARTS_DIR).join("portal/templates");
        fs::remove_dir(&templates).unwrap();
        fs::write(&templates, "").unwrap();

        assert!(!HelmStructureExists::new(temp.path()).test().passed);
    }

    #[test]
    fn test_files_directly_in_charts_are_ignored() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join(CHARTS_DIR)).unwrap();
        fs::write(temp.path().join(CHARTS_DIR).join("README.md"), "").unwrap();

        assert!(HelmStructureExists::new(temp.path()).test().passed);
    }
}

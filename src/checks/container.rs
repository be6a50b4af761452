//! TRG 4.02: container images build on an approved base image.
//!
//! Every Dockerfile in the checkout is inspected. The image of its final
//! stage, after resolving `ARG` defaults and references to earlier stages,
//! must be one of `ALLOWED_BASE_IMAGES`. Build stages may use any image.
//! A repository without Dockerfiles passes.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use super::{QualityGuideline, TestResult};
use crate::error::Result;

pub const BASE_IMAGE_GUIDELINE: &str = "TRG 4.02 - Base image";

const BASE_IMAGE_URL: &str = "https://eclipse-tractusx.github.io/docs/release/trg-4/trg-4-02";

/// Images a final stage may be built on, without tag or digest.
pub const ALLOWED_BASE_IMAGES: &[&str] = &["eclipse-temurin", "nginxinc/nginx-unprivileged"];

/// Final stage of every Dockerfile uses an allowed base image.
pub struct AllowedBaseImage {
    dir: PathBuf,
}

impl AllowedBaseImage {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }

    pub fn boxed(dir: &Path) -> Box<dyn QualityGuideline> {
        Box::new(Self::new(dir))
    }

    fn violations(&self) -> Result<Vec<String>> {
        let mut violations = Vec::new();
        for dockerfile in find_dockerfiles(&self.dir)? {
            let content = fs::read_to_string(&dockerfile)?;
            let relative = dockerfile
                .strip_prefix(&self.dir)
                .unwrap_or(&dockerfile)
                .display()
                .to_string();

            match final_base_image(&content)? {
                Some(image) if is_allowed(&image) => {}
                Some(image) => violations.push(format!(
                    "{} uses base image '{}'",
                    relative, image
                )),
                None => violations.push(format!("{} has no FROM instruction", relative)),
            }
        }
        Ok(violations)
    }
}

impl QualityGuideline for AllowedBaseImage {
    fn test(&self) -> TestResult {
        match self.violations() {
            Ok(violations) if violations.is_empty() => TestResult::pass(),
            Ok(violations) => TestResult::fail(format!(
                "{}. Allowed base images: {}",
                violations.join("; "),
                ALLOWED_BASE_IMAGES.join(", ")
            )),
            Err(e) => TestResult::from_error(BASE_IMAGE_GUIDELINE, e),
        }
    }

    fn is_optional(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        BASE_IMAGE_GUIDELINE
    }

    fn external_description(&self) -> &str {
        BASE_IMAGE_URL
    }
}

fn is_dockerfile_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower == "dockerfile" || lower.starts_with("dockerfile.") || lower.ends_with(".dockerfile")
}

/// All Dockerfiles below `dir`, skipping `.git`, in path order.
fn find_dockerfiles(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");

    for entry in walker {
        let entry = entry?;
        if entry.file_type().is_file() && is_dockerfile_name(&entry.file_name().to_string_lossy()) {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

const FROM_PATTERN: &str = r"(?i)^FROM\s+(?:--\S+\s+)*(\S+)(?:\s+AS\s+(\S+))?\s*$";
const ARG_PATTERN: &str = r"(?i)^ARG\s+([A-Za-z_][A-Za-z0-9_]*)=(\S+)\s*$";
const VARIABLE_PATTERN: &str = r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)";

/// Join continuation lines and drop comments and blank lines.
fn instructions(content: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current = String::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with('#') || (trimmed.is_empty() && current.is_empty()) {
            continue;
        }
        match trimmed.strip_suffix('\\') {
            Some(head) => {
                current.push_str(head.trim_end());
                current.push(' ');
            }
            None => {
                current.push_str(trimmed);
                if !current.trim().is_empty() {
                    result.push(current.trim().to_string());
                }
                current.clear();
            }
        }
    }
    if !current.trim().is_empty() {
        result.push(current.trim().to_string());
    }
    result
}

/// Replace `${NAME}` and `$NAME` with the known `ARG` defaults. Unknown
/// variables are left as written.
fn substitute_args(value: &str, args: &HashMap<String, String>, variable: &Regex) -> String {
    variable
        .replace_all(value, |caps: &regex::Captures| {
            let name = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            args.get(name)
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Resolve the image the last stage of a Dockerfile builds on.
///
/// Stage aliases are followed back to the image they were built from.
/// Returns `None` when there is no `FROM` instruction.
pub fn final_base_image(content: &str) -> Result<Option<String>> {
    let from = Regex::new(FROM_PATTERN)?;
    let arg = Regex::new(ARG_PATTERN)?;
    let variable = Regex::new(VARIABLE_PATTERN)?;

    let mut args = HashMap::new();
    let mut stages: HashMap<String, String> = HashMap::new();
    let mut last = None;

    for instruction in instructions(content) {
        if let Some(caps) = arg.captures(&instruction) {
            // Only ARGs before the first FROM are visible to FROM lines.
            if last.is_none() {
                let value = substitute_args(caps[2].trim_matches('"'), &args, &variable);
                args.insert(caps[1].to_string(), value);
            }
            continue;
        }

        if let Some(caps) = from.captures(&instruction) {
            let image = substitute_args(&caps[1], &args, &variable);
            // A stage built from an earlier stage inherits its image.
            let resolved = stages
                .get(&image.to_lowercase())
                .cloned()
                .unwrap_or(image);
            if let Some(alias) = caps.get(2) {
                stages.insert(alias.as_str().to_lowercase(), resolved.clone());
            }
            last = Some(resolved);
        }
    }

    Ok(last)
}

/// Strip registry, tag and digest from an image reference.
pub fn image_name(reference: &str) -> String {
    let without_digest = reference.split('@').next().unwrap_or(reference);
    // A ':' after the last '/' starts the tag; earlier ones belong to a
    // registry port.
    let without_tag = match without_digest.rfind(':') {
        Some(colon) if !without_digest[colon..].contains('/') => &without_digest[..colon],
        _ => without_digest,
    };

    let mut parts: Vec<&str> = without_tag.split('/').collect();
    if parts.len() > 1 {
        let first = parts[0];
        if first.contains('.') || first.contains(':') || first == "localhost" {
            parts.remove(0);
        }
    }
    if parts.len() > 1 && parts[0] == "library" {
        parts.remove(0);
    }
    parts.join("/").to_lowercase()
}

fn is_allowed(reference: &str) -> bool {
    let name = image_name(reference);
    ALLOWED_BASE_IMAGES.iter().any(|allowed| *allowed == name)
}

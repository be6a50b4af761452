//! # Error Handling
//!
//! This module defines the centralized error type for `trg-checks`. It uses
//! the `thiserror` library to build a single `Error` enum covering every
//! failure mode of a dashboard run, together with a `Result<T>` alias used
//! throughout the library.
//!
//! ## Containment
//!
//! Most of these errors never reach the caller of a full run. The
//! orchestrator contains them at the smallest possible scope:
//!
//! - **Transport / API errors** while listing repositories keep the pages
//!   gathered so far; while fetching metadata they resolve to "no metadata".
//! - **Metadata errors** (`MetadataNotFound`, `MetadataParse`) classify a
//!   repository as unhandled.
//! - **Clone errors** turn into a failing record for that one repository.
//! - **Check execution errors** become a failing guideline result.
//!
//! Only `Config` errors abort a run before it starts.

use thiserror::Error;

/// Main error type for trg-checks operations
#[derive(Error, Debug)]
pub enum Error {
    /// The repository metadata file exists but is not well-formed.
    #[error("Metadata parsing error: {message}")]
    MetadataParse { message: String },

    /// The repository does not contain a metadata file.
    #[error("Metadata file {path} not found in repository {repo}")]
    MetadataNotFound { repo: String, path: String },

    /// A request to the hosting API could not be completed.
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The hosting API answered with an unexpected status code.
    #[error("API error for {url}: HTTP {status} - {message}")]
    Api {
        url: String,
        status: u16,
        message: String,
    },

    /// Cloning a repository failed.
    ///
    /// Includes the repository URL, the error message, and an optional hint
    /// for resolution.
    #[error("Git clone error for {url}: {message}{}", hint.as_ref().map(|h| format!("\n  hint: {}", h)).unwrap_or_default())]
    GitClone {
        url: String,
        message: String,
        /// Optional hint for how to resolve the clone issue
        hint: Option<String>,
    },

    /// A git command could not be started or was killed.
    #[error("Git command failed for {url}: {command} - {stderr}")]
    GitCommand {
        command: String,
        url: String,
        stderr: String,
    },

    /// A guideline check failed internally while inspecting a checkout.
    #[error("Guideline check error: {check} - {message}")]
    CheckExecution { check: String, message: String },

    /// The run configuration is invalid.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A directory traversal error, wrapped from `walkdir::Error`.
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

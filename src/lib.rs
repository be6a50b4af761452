//! # Tractus-X Release Guideline Checks
//!
//! This library audits the public repositories of a GitHub organization
//! against the Tractus-X Release Guidelines (TRGs). It is used by the
//! `trg-checks` command-line tool, but every stage can also be driven on its
//! own.
//!
//! ## Quick Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use trg_checks::metadata;
//! use trg_checks::product::{products_from_metadata, RepoInfo, Repository};
//!
//! let portal = Repository::new("portal", "https://github.com/eclipse-tractusx/portal");
//! let metadata = metadata::parse(
//!     b"product: Portal\nleadingRepository: https://github.com/eclipse-tractusx/portal\n",
//! )
//! .unwrap();
//!
//! let mut repos = BTreeMap::new();
//! repos.insert(portal.url.clone(), RepoInfo::new(&portal, metadata));
//!
//! let products = products_from_metadata(&repos);
//! assert_eq!(products.len(), 1);
//! assert_eq!(products[0].name, "Portal");
//! ```
//!
//! ## Core Concepts
//!
//! - **Metadata (`metadata`)**: the `.tractusx` file each repository uses to
//!   declare its product and leading repository.
//! - **Repository Source (`github`)**: lists the organization's repositories
//!   and fetches their metadata through the GitHub REST API.
//! - **Products (`product`)**: reconstructs products from the per-repository
//!   declarations.
//! - **Checkouts (`repository`, `git`)**: shallow clones into temporary
//!   directories that are removed after use.
//! - **Guidelines (`checks`)**: the registered TRG checks and the pipeline
//!   that runs them against a checkout.
//! - **Reports (`report`, `output`)**: per-repository and per-product results,
//!   rendered as text or JSON.
//!
//! ## Execution Flow
//!
//! `dashboard::Dashboard::check_products` lists the repositories, resolves
//! their metadata, assembles products, then clones and checks every member
//! repository on a bounded worker pool.

pub mod checks;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod git;
pub mod github;
pub mod metadata;
pub mod output;
pub mod product;
pub mod report;
pub mod repository;

#[cfg(test)]
mod product_proptest;

//! # Product Assembly
//!
//! Repositories do not know about products on their own. Each one declares,
//! in its `.tractusx` metadata, which repository leads the product it belongs
//! to. This module reconstructs the product hierarchy from those per-repository
//! declarations.
//!
//! ## Algorithm
//!
//! `products_from_metadata` walks the resolved metadata in ascending URL order
//! and groups repositories by their declared leading repository:
//!
//! 1. The product for a leading-repository value is created lazily on first
//!    sight.
//! 2. Every repository joins the product it points at, including the leading
//!    repository itself.
//! 3. Only the leading repository's self-declaration (its own URL equals its
//!    declared leading repository, ignoring case) sets the product's name and
//!    leading repository.
//! 4. Products are returned sorted by name.
//!
//! A product whose leading repository never declares itself keeps an empty
//! name and leading repository. It is still returned, and a warning is logged.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::metadata::Metadata;

/// A repository of the audited organization. Identity is the URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A repository joined with its resolved metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoInfo {
    pub metadata: Metadata,
    pub repo_name: String,
    pub repo_url: String,
}

impl RepoInfo {
    pub fn new(repository: &Repository, metadata: Metadata) -> Self {
        Self {
            metadata,
            repo_name: repository.name.clone(),
            repo_url: repository.url.clone(),
        }
    }

    /// Whether this repository declares itself as the leading repository.
    pub fn is_leading(&self) -> bool {
        self.repo_url.to_lowercase() == self.metadata.leading_repository.to_lowercase()
    }
}

/// A group of repositories sharing one leading repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub leading_repo: String,
    pub repositories: Vec<Repository>,
}

impl Product {
    /// Whether the leading repository's self-declaration was seen.
    pub fn has_leading_declaration(&self) -> bool {
        !self.leading_repo.is_empty()
    }
}

/// Group resolved repositories into products.
///
/// The input is keyed by repository URL; its ascending key order fixes the
/// order of repositories within each product. Products with equal names keep
/// the order of their leading-repository values.
pub fn products_from_metadata(repo_info_by_url: &BTreeMap<String, RepoInfo>) -> Vec<Product> {
    info!("Forming products from repository metadata");

    let mut leading_repo_to_product: BTreeMap<&str, Product> = BTreeMap::new();
    for (url, info) in repo_info_by_url {
        debug!("Merging metadata for {}", url);
        let leading = info.metadata.leading_repository.as_str();

        let product = leading_repo_to_product.entry(leading).or_insert_with(|| {
            debug!("No product for leading repository {} yet, adding empty one", leading);
            Product::default()
        });

        debug!(
            "Adding repository {} ({}) to product led by {}",
            info.repo_name, info.repo_url, leading
        );
        product
            .repositories
            .push(Repository::new(&info.repo_name, &info.repo_url));

        if info.is_leading() {
            debug!(
                "Repository {} is leading, naming product '{}'",
                url, info.metadata.product_name
            );
            product.name = info.metadata.product_name.clone();
            product.leading_repo = info.metadata.leading_repository.clone();
        }
    }

    let mut products: Vec<Product> = leading_repo_to_product
        .into_iter()
        .map(|(leading, product)| {
            if !product.has_leading_declaration() {
                warn!(
                    "Leading repository '{}' never declares itself; product has no name ({} member repositories)",
                    leading,
                    product.repositories.len()
                );
            }
            product
        })
        .collect();

    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
}

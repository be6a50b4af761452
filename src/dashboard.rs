//! # Dashboard Orchestration
//!
//! This module drives a complete audit of an organization:
//!
//! 1. **Listing**: every public repository of the organization is listed,
//!    following pagination. A failed page keeps what was gathered before it.
//! 2. **Metadata**: the `.tractusx` file of every repository is resolved.
//!    Repositories without usable metadata are reported as unhandled.
//! 3. **Assembly**: products are reconstructed from the metadata with
//!    `products_from_metadata`.
//! 4. **Checks**: every member repository is cloned into its own temporary
//!    directory and run through the `GuidelinePipeline`. The directory is
//!    removed as soon as the checks finish, whatever their outcome.
//!
//! Metadata resolution and repository checks run on a dedicated rayon pool
//! of `jobs` threads. Results are collected in input order and folded into
//! the products afterwards, so no product record is shared between workers.
//! A clone failure only affects its own repository.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::checks::GuidelinePipeline;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::github::RepositorySource;
use crate::metadata::Metadata;
use crate::product::{products_from_metadata, Product, RepoInfo, Repository};
use crate::report::{CheckedProduct, CheckedRepository, DashboardReport};
use crate::repository::RepositoryCloner;

/// Progress notifications emitted while a run advances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The organization listing finished.
    Listed { repositories: usize },
    /// Metadata resolution of one repository finished, successfully or not.
    MetadataResolved { repository: String },
    /// Products were assembled; `repositories` members are about to be checked.
    Assembled { products: usize, repositories: usize },
    /// One repository finished its checks.
    RepositoryChecked { repository: String, passed: bool },
}

/// Products and unhandled repositories, before any repository is cloned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    pub products: Vec<Product>,
    pub unhandled_repositories: Vec<Repository>,
}

/// Audits the repositories of one organization.
pub struct Dashboard {
    source: RepositorySource,
    cloner: RepositoryCloner,
    pipeline: GuidelinePipeline,
    pool: ThreadPool,
}

impl Dashboard {
    /// Create a dashboard talking to GitHub and the system `git`.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Self::with_components(
            RepositorySource::new(config)?,
            RepositoryCloner::new(config.clone_timeout),
            GuidelinePipeline::default(),
            config.jobs,
        )
    }

    /// Create a dashboard from explicit components.
    ///
    /// `jobs` bounds the number of concurrent metadata fetches and
    /// repository checks; `1` runs everything sequentially.
    pub fn with_components(
        source: RepositorySource,
        cloner: RepositoryCloner,
        pipeline: GuidelinePipeline,
        jobs: usize,
    ) -> Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(jobs.max(1))
            .thread_name(|index| format!("trg-checks-worker-{}", index))
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to start worker pool: {}", e),
            })?;

        Ok(Self {
            source,
            cloner,
            pipeline,
            pool,
        })
    }

    /// List repositories, resolve their metadata and assemble products.
    pub fn discover_products(&self) -> Discovery {
        self.discover_with(&|_| {})
    }

    /// Run the full audit.
    pub fn check_products(&self) -> DashboardReport {
        self.check_products_with(&|_| {})
    }

    /// Run the full audit, reporting progress through `on_progress`.
    ///
    /// `on_progress` is called from worker threads.
    pub fn check_products_with(&self, on_progress: &(dyn Fn(Progress) + Sync)) -> DashboardReport {
        let discovery = self.discover_with(on_progress);
        let members: usize = discovery
            .products
            .iter()
            .map(|p| p.repositories.len())
            .sum();
        on_progress(Progress::Assembled {
            products: discovery.products.len(),
            repositories: members,
        });

        let work: Vec<(usize, &Repository)> = discovery
            .products
            .iter()
            .enumerate()
            .flat_map(|(index, product)| product.repositories.iter().map(move |r| (index, r)))
            .collect();

        let results: Vec<(usize, CheckedRepository)> = self.pool.install(|| {
            work.into_par_iter()
                .map(|(index, repo)| {
                    let checked = self.check_repository(repo);
                    on_progress(Progress::RepositoryChecked {
                        repository: checked.repo_name.clone(),
                        passed: checked.passed_all_guidelines,
                    });
                    (index, checked)
                })
                .collect()
        });

        let mut checked_products: Vec<CheckedProduct> = discovery
            .products
            .iter()
            .map(|p| CheckedProduct::new(&p.name, &p.leading_repo))
            .collect();
        for (index, checked) in results {
            checked_products[index].add_repository(checked);
        }

        for product in &checked_products {
            info!(
                "Product {}: {}",
                product.name,
                if product.overall_passed { "passed" } else { "failed" }
            );
        }

        DashboardReport {
            checked_products,
            unhandled_repositories: discovery.unhandled_repositories,
        }
    }

    /// Clone `repo` and run the guideline pipeline on it.
    ///
    /// A failed clone yields a failing record carrying the clone error.
    pub fn check_repository(&self, repo: &Repository) -> CheckedRepository {
        match self.cloner.checkout(repo) {
            Ok(checkout) => self.pipeline.run(repo, checkout.path()),
            Err(e) => {
                warn!("Could not clone repository {}: {}", repo.url, e);
                CheckedRepository::clone_failure(repo, e)
            }
        }
    }

    fn discover_with(&self, on_progress: &(dyn Fn(Progress) + Sync)) -> Discovery {
        let repositories = self.source.list_organization_repositories().items;
        info!(
            "Found {} repositories in organization {}",
            repositories.len(),
            self.source.organization()
        );
        on_progress(Progress::Listed {
            repositories: repositories.len(),
        });

        let resolved: Vec<(Repository, Option<Metadata>)> = self.pool.install(|| {
            repositories
                .into_par_iter()
                .map(|repo| {
                    let metadata = self.source.fetch_metadata(&repo);
                    on_progress(Progress::MetadataResolved {
                        repository: repo.name.clone(),
                    });
                    (repo, metadata)
                })
                .collect()
        });

        let mut repo_info_by_url = BTreeMap::new();
        let mut unhandled_repositories = Vec::new();
        for (repo, metadata) in resolved {
            match metadata {
                Some(metadata) => {
                    repo_info_by_url.insert(repo.url.clone(), RepoInfo::new(&repo, metadata));
                }
                None => {
                    debug!("Repository {} declares no product", repo.name);
                    unhandled_repositories.push(repo);
                }
            }
        }

        Discovery {
            products: products_from_metadata(&repo_info_by_url),
            unhandled_repositories,
        }
    }
}

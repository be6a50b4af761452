//! # Repository Source
//!
//! This module discovers the repositories of a GitHub organization and
//! resolves the `.tractusx` metadata of each one.
//!
//! ## Design
//!
//! The HTTP transport is hidden behind the `GitHubApi` trait, so that the
//! discovery logic can be exercised with mock implementations:
//!
//! - **`GitHubApi`**: one page of the organization's public repositories, and
//!   the raw content of a file inside a repository.
//! - **`GitHubClient`**: the default implementation, talking to the GitHub REST
//!   API with a blocking `reqwest` client. It is built once from a `Config`
//!   and owns the optional bearer token.
//! - **`RepositorySource`**: follows pagination and turns file content into
//!   `Metadata`, containing every failure.
//!
//! Listing keeps whatever pages were gathered before a failure. Metadata
//! resolution is deliberately lossy: a missing file, a transport error and a
//! malformed file all come back as `None`, each logged with its own reason.

use log::{debug, info, warn};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{ACCEPT, LINK};
use reqwest::StatusCode;
use serde::Deserialize;
use url::Url;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metadata::{self, Metadata, METADATA_FILE};
use crate::product::Repository;

const USER_AGENT: &str = concat!("trg-checks/", env!("CARGO_PKG_VERSION"));
const API_VERSION: &str = "2022-11-28";
const JSON_MEDIA_TYPE: &str = "application/vnd.github+json";
const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// The page to request next, or `None` on the last page.
    pub next_page: Option<u32>,
}

/// The result of following a paginated listing to its end.
///
/// `error` is set when a request failed; `items` then holds the pages that
/// were gathered before the failure.
#[derive(Debug)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub error: Option<Error>,
}

/// Trait for GitHub API operations - allows mocking in tests
pub trait GitHubApi: Send + Sync {
    /// Fetch one page of the organization's public repositories.
    fn list_org_repositories(&self, org: &str, page: u32, per_page: u32)
        -> Result<Page<Repository>>;

    /// Fetch the raw content of `path` in `owner/repo`.
    ///
    /// Returns `Ok(None)` when the file does not exist.
    fn get_file_content(&self, owner: &str, repo: &str, path: &str) -> Result<Option<Vec<u8>>>;
}

#[derive(Debug, Deserialize)]
struct ApiRepository {
    name: String,
    html_url: String,
}

/// The default implementation of `GitHubApi`, backed by the GitHub REST API.
pub struct GitHubClient {
    client: Client,
    base_url: Url,
    token: Option<String>,
}

impl GitHubClient {
    /// Build a client from the run configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.api_url)?;
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        if config.token.is_none() {
            info!("No GitHub token configured, requests are unauthenticated");
        }

        Ok(Self {
            client,
            base_url,
            token: config.token.clone(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| Error::Config {
                message: format!("API URL '{}' cannot be a base URL", self.base_url),
            })?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, url: &Url, accept: &str) -> RequestBuilder {
        let request = self
            .client
            .get(url.as_str())
            .header(ACCEPT, accept)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl GitHubApi for GitHubClient {
    fn list_org_repositories(
        &self,
        org: &str,
        page: u32,
        per_page: u32,
    ) -> Result<Page<Repository>> {
        let url = self.endpoint(&["orgs", org, "repos"])?;
        let response = self
            .request(&url, JSON_MEDIA_TYPE)
            .query(&[
                ("type", "public".to_string()),
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let next_page = response
            .headers()
            .get(LINK)
            .and_then(|value| value.to_str().ok())
            .and_then(next_page_from_link);

        let repos: Vec<ApiRepository> = response.json().map_err(|e| transport_error(&url, e))?;
        Ok(Page {
            items: repos
                .into_iter()
                .map(|r| Repository::new(r.name, r.html_url))
                .collect(),
            next_page,
        })
    }

    fn get_file_content(&self, owner: &str, repo: &str, path: &str) -> Result<Option<Vec<u8>>> {
        let url = self.endpoint(&["repos", owner, repo, "contents", path])?;
        let response = self
            .request(&url, RAW_MEDIA_TYPE)
            .send()
            .map_err(|e| transport_error(&url, e))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let bytes = response.bytes().map_err(|e| transport_error(&url, e))?;
                Ok(Some(bytes.to_vec()))
            }
            status => Err(Error::Api {
                url: url.to_string(),
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            }),
        }
    }
}

fn transport_error(url: &Url, err: reqwest::Error) -> Error {
    Error::Transport {
        url: url.to_string(),
        message: err.to_string(),
    }
}

/// Extract the `page` query parameter of the `rel="next"` entry of an
/// RFC 5988 `Link` header.
pub fn next_page_from_link(link: &str) -> Option<u32> {
    link.split(',').find_map(|entry| {
        let mut parts = entry.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| {
            let param = param.trim();
            param == r#"rel="next""# || param == "rel=next"
        });
        if !is_next {
            return None;
        }

        let target = target.strip_prefix('<')?.strip_suffix('>')?;
        let url = Url::parse(target).ok()?;
        url.query_pairs()
            .find(|(key, _)| key == "page")
            .and_then(|(_, value)| value.parse().ok())
    })
}

/// Call `list_page` for successive pages until no further page is signaled.
///
/// A failed request stops the loop; the items gathered so far are kept.
pub fn paginate<T, F>(mut list_page: F) -> Paginated<T>
where
    F: FnMut(u32) -> Result<Page<T>>,
{
    let mut items = Vec::new();
    let mut page = 1;

    loop {
        match list_page(page) {
            Ok(result) => {
                items.extend(result.items);
                match result.next_page {
                    // A non-advancing link would loop forever.
                    Some(next) if next > page => page = next,
                    _ => break,
                }
            }
            Err(e) => return Paginated { items, error: Some(e) },
        }
    }

    Paginated { items, error: None }
}

/// Discovers repositories and resolves their metadata.
pub struct RepositorySource {
    api: Box<dyn GitHubApi>,
    organization: String,
    per_page: u32,
}

impl RepositorySource {
    /// Create a source backed by the real GitHub API.
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self::with_api(Box::new(GitHubClient::new(config)?), config))
    }

    /// Create a source with a custom `GitHubApi` implementation.
    pub fn with_api(api: Box<dyn GitHubApi>, config: &Config) -> Self {
        Self {
            api,
            organization: config.organization.clone(),
            per_page: config.per_page,
        }
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// List every public repository of the organization, following pagination.
    pub fn list_organization_repositories(&self) -> Paginated<Repository> {
        info!("Listing repositories of GitHub organization {}", self.organization);
        let listing = paginate(|page| {
            debug!("Requesting repository page {}", page);
            self.api
                .list_org_repositories(&self.organization, page, self.per_page)
        });

        if let Some(e) = &listing.error {
            warn!(
                "Could not query repositories for GitHub organization {}: {} ({} repositories gathered)",
                self.organization,
                e,
                listing.items.len()
            );
        }
        listing
    }

    /// Resolve the metadata of one repository.
    ///
    /// Returns `None` when the file is missing, cannot be fetched, or cannot
    /// be parsed.
    pub fn fetch_metadata(&self, repo: &Repository) -> Option<Metadata> {
        debug!("Getting {} metadata for repository {}", METADATA_FILE, repo.name);
        let raw = match self
            .api
            .get_file_content(&self.organization, &repo.name, METADATA_FILE)
        {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!("Repository {} has no {} metadata file", repo.name, METADATA_FILE);
                return None;
            }
            Err(e) => {
                warn!(
                    "Could not get {} metadata for repository {}: {}",
                    METADATA_FILE, repo.name, e
                );
                return None;
            }
        };

        match metadata::parse(&raw) {
            Ok(metadata) => Some(metadata),
            Err(e) => {
                warn!(
                    "Could not parse {} metadata for repository {}: {}",
                    METADATA_FILE, repo.name, e
                );
                None
            }
        }
    }
}

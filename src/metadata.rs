//! # Repository Metadata
//!
//! Every repository that belongs to a product carries a small YAML
//! declaration file, `.tractusx`, at its root:
//!
//! ```yaml
//! product: "Eclipse Tractus-X Portal"
//! leadingRepository: "https://github.com/eclipse-tractusx/portal"
//! repositories:
//!   - name: "portal-frontend"
//!     usage: "Frontend of the portal"
//!     url: "https://github.com/eclipse-tractusx/portal-frontend"
//! ```
//!
//! `parse` turns the raw bytes of that file into a `Metadata` record. It is a
//! pure function; fetching the file is the job of the `github` module.
//! Missing keys default to empty values, but content that is empty or is not
//! a YAML mapping is rejected.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Well-known path of the metadata file inside a repository.
pub const METADATA_FILE: &str = ".tractusx";

/// Product declaration of a single repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Display name of the product this repository belongs to.
    #[serde(rename = "product", default)]
    pub product_name: String,
    /// URL of the repository that leads the product.
    #[serde(default)]
    pub leading_repository: String,
    /// Repositories the leading repository lists as part of the product.
    #[serde(default)]
    pub repositories: Vec<MetadataRepository>,
}

/// One entry of the optional `repositories` list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRepository {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub usage: String,
    #[serde(default)]
    pub url: String,
}

/// Parse the raw content of a `.tractusx` file.
pub fn parse(raw: &[u8]) -> Result<Metadata> {
    let content = std::str::from_utf8(raw).map_err(|e| Error::MetadataParse {
        message: format!("metadata is not valid UTF-8: {}", e),
    })?;

    if content.trim().is_empty() {
        return Err(Error::MetadataParse {
            message: "metadata file is empty".to_string(),
        });
    }

    serde_yaml::from_str(content).map_err(|e| Error::MetadataParse {
        message: e.to_string(),
    })
}

/// Read and parse a metadata file from a local checkout.
pub fn from_dir(dir: &std::path::Path) -> Result<Metadata> {
    let path = dir.join(METADATA_FILE);
    if !path.is_file() {
        return Err(Error::MetadataNotFound {
            repo: dir.display().to_string(),
            path: METADATA_FILE.to_string(),
        });
    }
    parse(&std::fs::read(path)?)
}

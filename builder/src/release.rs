//! GitHub release lookup and asset upload.
//!
//! Provides a trait-based abstraction over the releases API so the lookup
//! and publish logic can be tested without network access.

use crate::error::BuilderError;
use crate::naming::ReleaseTag;
use camino::Utf8Path;
use log::{debug, info};
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

/// Default REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default asset upload endpoint.
pub const DEFAULT_UPLOADS_URL: &str = "https://uploads.github.com";

/// Releases requested per page when listing.
const PER_PAGE: usize = 100;

/// REST API version pinned on every request.
const API_VERSION: &str = "2022-11-28";

/// A release as returned by the releases API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Numeric release identifier used for asset uploads.
    pub id: u64,
    /// Git tag the release points at.
    pub tag_name: String,
    /// Display name, if set.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether the release is still a draft.
    #[serde(default)]
    pub draft: bool,
}

/// Errors arising from release operations.
#[derive(Debug, thiserror::Error)]
pub enum ReleaseError {
    /// No release carries the requested tag.
    #[error("No release found for tag: {tag}")]
    ReleaseNotFound {
        /// The tag that was looked up.
        tag: String,
    },

    /// HTTP request failed.
    #[error("request failed for {url}: {reason}")]
    Http {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The response body was not the expected JSON.
    #[error("unexpected response from {url}: {reason}")]
    Decode {
        /// The URL that was requested.
        url: String,
        /// Description of the decode failure.
        reason: String,
    },

    /// Reading the asset from disk failed.
    #[error("I/O error reading asset: {0}")]
    Io(#[from] std::io::Error),
}

/// Client for the releases of one repository.
#[cfg_attr(test, mockall::automock)]
pub trait ReleaseClient {
    /// List every release of the repository, drafts included.
    ///
    /// # Errors
    ///
    /// Returns an error if a request fails or a page cannot be decoded.
    fn list_releases(&self) -> Result<Vec<Release>, ReleaseError>;

    /// Attach `data` to the release `release_id` as an asset called `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected.
    fn upload_asset(&self, release_id: u64, name: &str, data: &[u8]) -> Result<(), ReleaseError>;
}

/// An `owner/repo` pair.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::release::Repository;
///
/// let repo = Repository::parse("php/pie-ext-binary-builder").expect("valid");
/// assert_eq!(repo.owner(), "php");
/// assert_eq!(repo.name(), "pie-ext-binary-builder");
/// assert!(Repository::parse("no-slash").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    owner: String,
    name: String,
}

impl Repository {
    /// Parse an `owner/repo` string.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidRepository`] unless the value is two
    /// non-empty segments separated by a single `/`.
    pub fn parse(value: &str) -> Result<Self, BuilderError> {
        let invalid = || BuilderError::InvalidRepository {
            value: value.to_owned(),
        };
        let (owner, name) = value.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            owner: owner.to_owned(),
            name: name.to_owned(),
        })
    }

    /// Repository owner.
    #[must_use]
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Repository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// HTTP-based release client using `ureq`.
pub struct GitHubReleases {
    api_url: String,
    uploads_url: String,
    repository: Repository,
    token: String,
}

impl GitHubReleases {
    /// Create a client for `repository`.
    #[must_use]
    pub fn new(api_url: &str, uploads_url: &str, repository: Repository, token: String) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            uploads_url: uploads_url.trim_end_matches('/').to_owned(),
            repository,
            token,
        }
    }

    /// URL listing the repository's releases.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::release::{GitHubReleases, Repository};
    ///
    /// let repo = Repository::parse("foo/bar").expect("valid");
    /// let client = GitHubReleases::new("https://api.github.com/", "https://uploads.github.com", repo, String::new());
    /// assert_eq!(client.releases_url(), "https://api.github.com/repos/foo/bar/releases");
    /// ```
    #[must_use]
    pub fn releases_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/releases",
            self.api_url,
            self.repository.owner(),
            self.repository.name()
        )
    }

    /// URL accepting asset uploads for `release_id`.
    #[must_use]
    pub fn assets_url(&self, release_id: u64) -> String {
        format!(
            "{}/repos/{}/{}/releases/{release_id}/assets",
            self.uploads_url,
            self.repository.owner(),
            self.repository.name()
        )
    }

    fn fetch_page(&self, url: &str, page: usize) -> Result<Vec<Release>, ReleaseError> {
        debug!("GET {url} page {page}");
        let response = self
            .authorised(http_agent().get(url))
            .query("per_page", PER_PAGE.to_string())
            .query("page", page.to_string())
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| map_ureq_error(url, &e))?;
        serde_json::from_str(&body).map_err(|e| ReleaseError::Decode {
            url: url.to_owned(),
            reason: e.to_string(),
        })
    }

    fn authorised<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", concat!("pie-ext-builder/", env!("CARGO_PKG_VERSION")))
    }
}

impl ReleaseClient for GitHubReleases {
    fn list_releases(&self) -> Result<Vec<Release>, ReleaseError> {
        let url = self.releases_url();
        let mut releases = Vec::new();
        for page in 1.. {
            let batch = self.fetch_page(&url, page)?;
            let last = batch.len() < PER_PAGE;
            releases.extend(batch);
            if last {
                break;
            }
        }
        Ok(releases)
    }

    fn upload_asset(&self, release_id: u64, name: &str, data: &[u8]) -> Result<(), ReleaseError> {
        let url = self.assets_url(release_id);
        debug!("POST {url} name={name} ({} bytes)", data.len());
        self.authorised(http_agent().post(&url))
            .header("Content-Type", "application/zip")
            .query("name", name)
            .send(data)
            .map_err(|e| map_ureq_error(&url, &e))?;
        Ok(())
    }
}

/// Find the release whose tag is exactly `tag`.
///
/// # Errors
///
/// Returns [`ReleaseError::ReleaseNotFound`] if no release matches, or the
/// client's error if listing fails.
pub fn find_release(client: &dyn ReleaseClient, tag: &ReleaseTag) -> Result<Release, ReleaseError> {
    info!("Looking up release {tag}...");
    client
        .list_releases()?
        .into_iter()
        .find(|release| release.tag_name == tag.as_str())
        .ok_or_else(|| ReleaseError::ReleaseNotFound {
            tag: tag.to_string(),
        })
}

/// Upload the package at `package_path` to the release tagged `tag`.
///
/// The asset is named after the package's filename.
///
/// # Errors
///
/// Returns [`ReleaseError::ReleaseNotFound`] if the release does not exist,
/// [`ReleaseError::Io`] if the package cannot be read, or the client's error
/// if the upload fails.
pub fn publish_asset(
    client: &dyn ReleaseClient,
    tag: &ReleaseTag,
    package_path: &Utf8Path,
) -> Result<Release, ReleaseError> {
    let release = find_release(client, tag)?;
    let name = package_path.file_name().unwrap_or(package_path.as_str());
    let data = std::fs::read(package_path)?;
    info!("Uploading {name} to release {} (id {})", release.tag_name, release.id);
    client.upload_asset(release.id, name, &data)?;
    Ok(release)
}

/// Shared `ureq` agent with the client's default configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(ureq::Agent::new_with_defaults)
}

/// Map a ureq error to a [`ReleaseError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> ReleaseError {
    ReleaseError::Http {
        url: url.to_owned(),
        reason: match err {
            ureq::Error::StatusCode(code) => format!("HTTP status {code}"),
            other => other.to_string(),
        },
    }
}

//! Validated run configuration.
//!
//! Turns raw CLI/action inputs into typed values before any side effect
//! happens, so a missing token is reported before a lengthy build.

use crate::builder::ConfigureFlags;
use crate::cli::Cli;
use crate::error::{BuilderError, Result};
use crate::naming::ReleaseTag;
use crate::release::Repository;
use camino::Utf8PathBuf;

/// Environment variable consulted when `--github-token` is not given.
pub const TOKEN_FALLBACK_ENV: &str = "GITHUB_TOKEN";

/// Where and as whom to publish the package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishTarget {
    /// Base URL of the REST API.
    pub api_url: String,
    /// Base URL for release asset uploads.
    pub uploads_url: String,
    /// Repository owning the release.
    pub repository: Repository,
    /// API token.
    pub token: String,
}

/// Inputs for one build-and-publish run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Release the package is attached to.
    pub release_tag: ReleaseTag,
    /// Flags passed through to `./configure`.
    pub configure_flags: ConfigureFlags,
    /// Path to the package manifest.
    pub manifest: Utf8PathBuf,
    /// File receiving the `package-path` output, if any.
    pub github_output: Option<Utf8PathBuf>,
    /// Publishing details; `None` for a dry run.
    pub publish: Option<PublishTarget>,
}

impl RunConfig {
    /// Validate CLI inputs.
    ///
    /// `fallback_token` stands in for `--github-token` when it is absent or
    /// empty; the binary passes the value of [`TOKEN_FALLBACK_ENV`].
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::MissingInput`] when the release tag is empty,
    /// or when the token or repository is missing outside a dry run, and
    /// [`BuilderError::InvalidRepository`] for a malformed repository.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::cli::Cli;
    /// use pie_ext_builder::config::RunConfig;
    ///
    /// let cli = Cli {
    ///     release_tag: Some("1.0.0".to_owned()),
    ///     dry_run: true,
    ///     ..Cli::default()
    /// };
    /// let config = RunConfig::from_cli(&cli, None).expect("dry run needs no token");
    /// assert!(config.publish.is_none());
    /// ```
    pub fn from_cli(cli: &Cli, fallback_token: Option<String>) -> Result<Self> {
        let release_tag = ReleaseTag::try_from(cli.release_tag.as_deref().unwrap_or_default())?;

        let publish = if cli.dry_run {
            None
        } else {
            Some(publish_target(cli, fallback_token)?)
        };

        Ok(Self {
            release_tag,
            configure_flags: ConfigureFlags::parse(&cli.configure_flags),
            manifest: cli.manifest.clone(),
            github_output: cli.github_output.clone().filter(|path| !path.as_str().is_empty()),
            publish,
        })
    }

    /// Return true when building and uploading are skipped.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.publish.is_none()
    }
}

fn publish_target(cli: &Cli, fallback_token: Option<String>) -> Result<PublishTarget> {
    let token = non_empty(cli.github_token.clone())
        .or_else(|| non_empty(fallback_token))
        .ok_or(BuilderError::MissingInput {
            name: "github-token",
        })?;
    let repository = non_empty(cli.repository.clone()).ok_or(BuilderError::MissingInput {
        name: "repository",
    })?;

    Ok(PublishTarget {
        api_url: cli.api_url.clone(),
        uploads_url: cli.uploads_url.clone(),
        repository: Repository::parse(&repository)?,
        token,
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

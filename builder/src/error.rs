//! Error types for the PIE extension builder.
//!
//! This module defines semantic error variants that tell the workflow author
//! which precondition or step failed. Each variant carries the offending value
//! so the single terminal message printed by the binary is actionable.

use crate::packaging::PackagingError;
use crate::release::ReleaseError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can abort a build-and-publish run.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// The package manifest does not exist at the expected location.
    #[error("{path} not found. This does not appear to be a PIE package.")]
    ManifestMissing {
        /// Path where the manifest was expected.
        path: Utf8PathBuf,
    },

    /// The package manifest could not be decoded as JSON.
    #[error("invalid manifest at {path}: {reason}")]
    InvalidManifest {
        /// Path to the manifest.
        path: Utf8PathBuf,
        /// Description of the decode failure.
        reason: String,
    },

    /// The manifest `type` is not one of the PHP extension package types.
    #[error("composer.json type must be \"php-ext\" or \"php-ext-zend\", but \"{found}\" was found.")]
    InvalidManifestType {
        /// The rejected `type` value (`null` when absent).
        found: String,
    },

    /// Neither `php-ext.extension-name` nor `name` is present in the manifest.
    #[error(
        "Could not determine extension name: both .\"php-ext\".\"extension-name\" and .name are missing in composer.json"
    )]
    NameMissing,

    /// The resolved extension name does not match the PIE naming grammar.
    #[error("Invalid extension name: \"{name}\" - must be alphanumeric/underscores only.")]
    InvalidExtensionName {
        /// The rejected name, after any `ext-` prefix was stripped.
        name: String,
    },

    /// The host CPU architecture has no PIE platform identifier.
    #[error("Unsupported architecture: {arch}")]
    UnsupportedArchitecture {
        /// The host architecture identifier.
        arch: String,
    },

    /// The host operating system is not supported.
    #[error("Unsupported operating system: {os}")]
    UnsupportedOperatingSystem {
        /// The host operating system identifier.
        os: String,
    },

    /// `php-config --version` did not start with `<major>.<minor>`.
    #[error("could not derive PHP major.minor version from \"{output}\"")]
    InvalidPhpVersion {
        /// The raw version output.
        output: String,
    },

    /// An interpreter probe printed something other than its flag or nothing.
    #[error("{probe} probe printed unexpected output \"{output}\"")]
    UnexpectedProbeOutput {
        /// Name of the probe (`debug`, `zts`).
        probe: &'static str,
        /// The trimmed probe output.
        output: String,
    },

    /// An inspection command exited with a non-zero status.
    #[error("`{command}` failed with {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Rendered exit status.
        status: String,
        /// Captured standard error, trimmed.
        stderr: String,
    },

    /// A build step exited with a non-zero status.
    #[error("build step `{step}` failed with {status}")]
    BuildFailed {
        /// The build step that failed (`phpize`, `./configure`, `make`).
        step: String,
        /// Rendered exit status.
        status: String,
    },

    /// A required input was not supplied.
    #[error("input `{name}` is required")]
    MissingInput {
        /// The input name as written in the workflow (`release-tag`).
        name: &'static str,
    },

    /// The repository is not in `owner/repo` form.
    #[error("repository must be in owner/repo form, got \"{value}\"")]
    InvalidRepository {
        /// The rejected repository value.
        value: String,
    },

    /// Packaging the shared object failed.
    #[error(transparent)]
    Packaging(#[from] PackagingError),

    /// Locating the release or uploading the asset failed.
    #[error(transparent)]
    Release(#[from] ReleaseError),

    /// Writing the `package-path` output failed.
    #[error("failed to write output to {target}")]
    OutputWriteFailed {
        /// The output file or stream the value was written to.
        target: String,
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

/// Result type alias using [`BuilderError`].
pub type Result<T> = std::result::Result<T, BuilderError>;

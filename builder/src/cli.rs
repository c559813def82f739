//! CLI argument definitions for the PIE extension builder.
//!
//! Every flag falls back to the environment variable GitHub Actions sets for
//! the matching action input, so the binary can be used both as an action
//! step and from a shell.

use crate::manifest::MANIFEST_FILE;
use crate::release::{DEFAULT_API_URL, DEFAULT_UPLOADS_URL};
use camino::Utf8PathBuf;
use clap::Parser;
use log::LevelFilter;

/// Build a PHP extension and attach a PIE binary package to a GitHub release.
#[derive(Parser, Debug, Clone)]
#[command(name = "pie-ext-builder")]
#[command(version, about)]
#[command(long_about = concat!(
    "Build a PHP extension and attach a PIE binary package to a GitHub release.\n\n",
    "Run from the root of a PIE extension package. The extension is built with ",
    "phpize, ./configure and make, zipped under the filename PIE expects for this ",
    "platform, and uploaded to the existing release with the given tag.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Build and publish to release 1.0.0:\n",
    "    $ pie-ext-builder --release-tag 1.0.0 --repository php/ext-foo\n\n",
    "  Pass flags through to ./configure:\n",
    "    $ pie-ext-builder --release-tag 1.0.0 --configure-flags \"--enable-foo --with-bar\"\n\n",
    "  Print the package name without building:\n",
    "    $ pie-ext-builder --release-tag 1.0.0 --dry-run",
))]
pub struct Cli {
    /// Exact tag of the release to attach the package to.
    #[arg(long, env = "INPUT_RELEASE-TAG", value_name = "TAG")]
    pub release_tag: Option<String>,

    /// Whitespace-delimited flags passed to ./configure.
    #[arg(
        long,
        env = "INPUT_CONFIGURE-FLAGS",
        value_name = "FLAGS",
        default_value = "",
        allow_hyphen_values = true
    )]
    pub configure_flags: String,

    /// Token used to call the releases API [falls back to GITHUB_TOKEN].
    #[arg(long, env = "INPUT_GITHUB-TOKEN", value_name = "TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Repository owning the release, as owner/repo.
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/REPO")]
    pub repository: Option<String>,

    /// Base URL of the REST API.
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Base URL for release asset uploads.
    #[arg(long, env = "PIE_UPLOADS_URL", value_name = "URL", default_value = DEFAULT_UPLOADS_URL)]
    pub uploads_url: String,

    /// Path to the package manifest.
    #[arg(long, value_name = "FILE", default_value = MANIFEST_FILE)]
    pub manifest: Utf8PathBuf,

    /// File receiving the `package-path` output [default: stdout].
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "FILE")]
    pub github_output: Option<Utf8PathBuf>,

    /// Derive and print the package name without building or uploading.
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Map `-q`/`-v` onto a log level filter.
    ///
    /// # Examples
    ///
    /// ```
    /// use log::LevelFilter;
    /// use pie_ext_builder::cli::Cli;
    ///
    /// assert_eq!(Cli::default().log_level(), LevelFilter::Info);
    /// let verbose = Cli { verbosity: 1, ..Cli::default() };
    /// assert_eq!(verbose.log_level(), LevelFilter::Debug);
    /// ```
    #[must_use]
    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Warn;
        }
        match self.verbosity {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

impl Default for Cli {
    /// Creates a `Cli` with no inputs supplied and default endpoints.
    ///
    /// Useful for programmatic construction where only specific fields need
    /// to be set; unlike parsing, it never reads the environment.
    fn default() -> Self {
        Self {
            release_tag: None,
            configure_flags: String::new(),
            github_token: None,
            repository: None,
            api_url: DEFAULT_API_URL.to_owned(),
            uploads_url: DEFAULT_UPLOADS_URL.to_owned(),
            manifest: Utf8PathBuf::from(MANIFEST_FILE),
            github_output: None,
            dry_run: false,
            verbosity: 0,
            quiet: false,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

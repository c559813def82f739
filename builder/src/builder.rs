//! Build driver for PHP extensions.
//!
//! Runs the standard `phpize`, `./configure`, `make` sequence in the current
//! directory with output streamed to the CI log.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, command_line};
use log::info;

/// Arguments passed through to `./configure`.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::builder::ConfigureFlags;
///
/// let flags = ConfigureFlags::parse("  --enable-foo   --with-bar=/usr ");
/// assert_eq!(flags.as_args(), vec!["--enable-foo", "--with-bar=/usr"]);
/// assert!(ConfigureFlags::parse("").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigureFlags(Vec<String>);

impl ConfigureFlags {
    /// Split a whitespace-delimited flag string, dropping empty tokens.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self(raw.split_whitespace().map(str::to_owned).collect())
    }

    /// Borrow the flags as argument slices.
    #[must_use]
    pub fn as_args(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    /// Return true when no flags were supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Builder for compiling a PHP extension from source.
pub struct ExtensionBuilder<'a> {
    executor: &'a dyn CommandExecutor,
}

impl<'a> ExtensionBuilder<'a> {
    /// Create a new builder that runs its steps through `executor`.
    #[must_use]
    pub fn new(executor: &'a dyn CommandExecutor) -> Self {
        Self { executor }
    }

    /// Run `phpize`, `./configure <flags>` and `make`, stopping at the first
    /// failing step.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::BuildFailed`] naming the step that exited
    /// non-zero, or the executor's error if a step cannot be spawned.
    pub fn build(&self, flags: &ConfigureFlags) -> Result<()> {
        info!("Building extension...");
        self.step("phpize", &[])?;
        self.step("./configure", &flags.as_args())?;
        self.step("make", &[])
    }

    fn step(&self, cmd: &str, args: &[&str]) -> Result<()> {
        info!("Running {}", command_line(cmd, args));
        let status = self.executor.run_inherited(cmd, args)?;
        if !status.success() {
            return Err(BuilderError::BuildFailed {
                step: cmd.to_owned(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

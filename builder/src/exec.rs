//! External command execution.
//!
//! Every platform probe and build step goes through [`CommandExecutor`] so the
//! inspection and validation logic can be exercised with a scripted stub
//! instead of real `php-config`, `ldd` or `make` processes.

use crate::error::{BuilderError, Result};
use camino::Utf8PathBuf;
use log::debug;
use std::process::{Command, ExitStatus, Output};

/// Abstraction for running external commands.
pub trait CommandExecutor {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// A non-zero exit status is not an error at this level; callers decide
    /// whether to tolerate it.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pie_ext_builder::exec::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor::default();
    /// let output = executor.run("php-config", &["--version"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), pie_ext_builder::error::BuilderError>(())
    /// ```
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output>;

    /// Runs a command with the parent's stdio attached and returns its status.
    ///
    /// Used for build steps whose output belongs in the CI log.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or waiting for the
    /// command.
    fn run_inherited(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus>;
}

/// Executes commands on the host system.
///
/// Commands run in the process's current directory unless one is set with
/// [`SystemCommandExecutor::in_dir`].
#[derive(Debug, Clone, Default)]
pub struct SystemCommandExecutor {
    current_dir: Option<Utf8PathBuf>,
}

impl SystemCommandExecutor {
    /// Create an executor whose commands all run in `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            current_dir: Some(dir.into()),
        }
    }

    fn command(&self, cmd: &str, args: &[&str]) -> Command {
        debug!("running {}", command_line(cmd, args));
        let mut command = Command::new(cmd);
        command.args(args);
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.command(cmd, args).output().map_err(BuilderError::from)
    }

    fn run_inherited(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus> {
        self.command(cmd, args).status().map_err(BuilderError::from)
    }
}

/// Runs a command that must succeed and returns its trimmed stdout.
///
/// # Errors
///
/// Returns [`BuilderError::CommandFailed`] when the command exits non-zero,
/// or the executor's error when it cannot be spawned.
pub fn stdout_of(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> Result<String> {
    let output = executor.run(cmd, args)?;
    if !output.status.success() {
        return Err(BuilderError::CommandFailed {
            command: command_line(cmd, args),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_owned())
}

/// Render a command and its arguments for messages.
#[must_use]
pub fn command_line(cmd: &str, args: &[&str]) -> String {
    if args.is_empty() {
        cmd.to_owned()
    } else {
        format!("{cmd} {}", args.join(" "))
    }
}

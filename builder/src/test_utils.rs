//! Shared test utilities for the builder crate.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, command_line};
use crate::release::{Release, ReleaseClient, ReleaseError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::process::{ExitStatus, Output};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    stdout_output("")
}

/// Creates a successful command `Output` with the given stdout.
#[must_use]
pub fn stdout_output(stdout: &str) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "php-config").
    pub cmd: &'static str,
    /// The arguments to pass to the command.
    pub args: Vec<&'static str>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Records expected command invocations in order and returns predefined
/// results. An out-of-order or unexpected call yields
/// [`BuilderError::StubMismatch`] so the failure surfaces through the code
/// under test.
#[derive(Debug)]
pub struct StubExecutor {
    expected: RefCell<VecDeque<ExpectedCall>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: RefCell::new(expected.into()),
        }
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        let remaining = self.expected.borrow();
        assert!(
            remaining.is_empty(),
            "expected no further command invocations, {} remaining: {:?}",
            remaining.len(),
            remaining.iter().map(|c| c.cmd).collect::<Vec<_>>()
        );
    }

    fn next_call(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        let mut expected = self.expected.borrow_mut();
        let Some(call) = expected.pop_front() else {
            return Err(BuilderError::StubMismatch {
                message: format!("unexpected invocation of `{}`", command_line(cmd, args)),
            });
        };

        if call.cmd != cmd || call.args.as_slice() != args {
            return Err(BuilderError::StubMismatch {
                message: format!(
                    "expected `{}`, got `{}`",
                    command_line(call.cmd, &call.args),
                    command_line(cmd, args)
                ),
            });
        }

        call.result
    }
}

impl CommandExecutor for StubExecutor {
    fn run(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        self.next_call(cmd, args)
    }

    fn run_inherited(&self, cmd: &str, args: &[&str]) -> Result<ExitStatus> {
        self.next_call(cmd, args).map(|output| output.status)
    }
}

/// Creates a published [`Release`] with the given id and tag.
#[must_use]
pub fn release(id: u64, tag: &str) -> Release {
    Release {
        id,
        tag_name: tag.to_owned(),
        name: Some(tag.to_owned()),
        draft: false,
    }
}

/// An asset recorded by [`StubReleases`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    /// Release the asset was attached to.
    pub release_id: u64,
    /// Asset name.
    pub name: String,
    /// Uploaded bytes.
    pub data: Vec<u8>,
}

/// An in-memory `ReleaseClient` for testing.
///
/// Lists a fixed set of releases and records every upload.
#[derive(Debug, Default)]
pub struct StubReleases {
    releases: Vec<Release>,
    uploads: RefCell<Vec<UploadedAsset>>,
}

impl StubReleases {
    /// Creates a client listing `releases`.
    #[must_use]
    pub fn new(releases: Vec<Release>) -> Self {
        Self {
            releases,
            uploads: RefCell::new(Vec::new()),
        }
    }

    /// Returns the uploads received so far.
    #[must_use]
    pub fn uploads(&self) -> Vec<UploadedAsset> {
        self.uploads.borrow().clone()
    }
}

impl ReleaseClient for StubReleases {
    fn list_releases(&self) -> std::result::Result<Vec<Release>, ReleaseError> {
        Ok(self.releases.clone())
    }

    fn upload_asset(
        &self,
        release_id: u64,
        name: &str,
        data: &[u8],
    ) -> std::result::Result<(), ReleaseError> {
        self.uploads.borrow_mut().push(UploadedAsset {
            release_id,
            name: name.to_owned(),
            data: data.to_vec(),
        });
        Ok(())
    }
}

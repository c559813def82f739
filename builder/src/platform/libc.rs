//! C library flavour detection.

use super::os::OperatingSystem;
use crate::error::Result;
use crate::exec::CommandExecutor;
use log::{debug, info};
use std::fmt;

/// The C library a binary was linked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibcFlavour {
    /// GNU libc.
    Glibc,
    /// musl libc (Alpine and friends).
    Musl,
    /// The BSD libc shipped with macOS.
    Bsdlibc,
}

impl LibcFlavour {
    /// Detect the libc flavour of the host.
    ///
    /// macOS always reports [`LibcFlavour::Bsdlibc`] without probing. On
    /// Linux `ldd --version` is run; its exit status is ignored because musl's
    /// `ldd` exits non-zero, and any mention of `musl` in its output selects
    /// [`LibcFlavour::Musl`]. Everything else is glibc.
    ///
    /// # Errors
    ///
    /// Returns the executor's error when `ldd` cannot be spawned.
    pub fn detect(os: OperatingSystem, executor: &dyn CommandExecutor) -> Result<Self> {
        info!("Detecting libc flavour...");
        if os == OperatingSystem::Darwin {
            return Ok(Self::Bsdlibc);
        }

        let output = executor.run("ldd", &["--version"])?;
        if !output.status.success() {
            debug!("ldd --version exited with {}", output.status);
        }

        let mentions_musl = [&output.stdout, &output.stderr]
            .iter()
            .any(|stream| String::from_utf8_lossy(stream).contains("musl"));
        Ok(if mentions_musl { Self::Musl } else { Self::Glibc })
    }

    /// Return the filename fragment for this flavour.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Glibc => "glibc",
            Self::Musl => "musl",
            Self::Bsdlibc => "bsdlibc",
        }
    }
}

impl fmt::Display for LibcFlavour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, exit_status, stdout_output};
    use std::process::Output;

    fn ldd_call(output: Output) -> ExpectedCall {
        ExpectedCall {
            cmd: "ldd",
            args: vec!["--version"],
            result: Ok(output),
        }
    }

    #[test]
    fn darwin_is_bsdlibc_without_probing() {
        let executor = StubExecutor::new(Vec::new());

        let flavour = LibcFlavour::detect(OperatingSystem::Darwin, &executor).expect("detected");

        assert_eq!(flavour, LibcFlavour::Bsdlibc);
        executor.assert_finished();
    }

    #[test]
    fn glibc_ldd_output_is_glibc() {
        let executor = StubExecutor::new(vec![ldd_call(stdout_output(
            "ldd (Ubuntu GLIBC 2.39-0ubuntu8) 2.39\nCopyright (C) 2024 Free Software Foundation, Inc.\n",
        ))]);

        let flavour = LibcFlavour::detect(OperatingSystem::Linux, &executor).expect("detected");

        assert_eq!(flavour, LibcFlavour::Glibc);
        executor.assert_finished();
    }

    #[test]
    fn musl_on_stdout_is_musl() {
        let executor = StubExecutor::new(vec![ldd_call(stdout_output("musl libc (x86_64)\n"))]);

        let flavour = LibcFlavour::detect(OperatingSystem::Linux, &executor).expect("detected");

        assert_eq!(flavour, LibcFlavour::Musl);
    }

    #[test]
    fn musl_on_stderr_with_failing_exit_is_musl() {
        let executor = StubExecutor::new(vec![ldd_call(Output {
            status: exit_status(1),
            stdout: Vec::new(),
            stderr: b"musl libc (aarch64)\nVersion 1.2.5\n".to_vec(),
        })]);

        let flavour = LibcFlavour::detect(OperatingSystem::Linux, &executor).expect("detected");

        assert_eq!(flavour, LibcFlavour::Musl);
    }

    #[test]
    fn failing_probe_without_musl_defaults_to_glibc() {
        let executor = StubExecutor::new(vec![ldd_call(Output {
            status: exit_status(127),
            stdout: Vec::new(),
            stderr: b"ldd: command not usable".to_vec(),
        })]);

        let flavour = LibcFlavour::detect(OperatingSystem::Linux, &executor).expect("detected");

        assert_eq!(flavour, LibcFlavour::Glibc);
    }
}

//! PHP interpreter introspection via `php-config` and the interpreter itself.

use crate::error::{BuilderError, Result};
use crate::exec::{CommandExecutor, stdout_of};
use log::{info, warn};
use std::fmt;

/// Sentinel `php-config --php-binary` prints when it does not know the path.
const UNKNOWN_BINARY: &str = "NONE";

/// Interpreter used when `php-config` cannot name one.
pub const DEFAULT_PHP_BINARY: &str = "php";

/// Script printing `-debug` for debug builds of PHP.
const DEBUG_PROBE: &str = "echo PHP_DEBUG ? '-debug' : '';";

/// Script printing `-zts` for thread-safe builds of PHP.
const ZTS_PROBE: &str = "echo ZEND_THREAD_SAFE ? '-zts' : '';";

/// Filename fragment for debug builds.
pub const DEBUG_SUFFIX: &str = "-debug";

/// Filename fragment for thread-safe builds.
pub const ZTS_SUFFIX: &str = "-zts";

/// Locate the PHP interpreter the extension is being built for.
///
/// # Errors
///
/// Returns [`BuilderError::CommandFailed`] if `php-config --php-binary`
/// exits non-zero.
pub fn php_binary(executor: &dyn CommandExecutor) -> Result<String> {
    info!("Locating PHP binary...");
    let binary = stdout_of(executor, "php-config", &["--php-binary"])?;
    if binary == UNKNOWN_BINARY {
        warn!("php-config --php-binary returned NONE, falling back to '{DEFAULT_PHP_BINARY}' from PATH");
        return Ok(DEFAULT_PHP_BINARY.to_owned());
    }
    Ok(binary)
}

/// A PHP `major.minor` version, as used in package filenames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PhpVersion {
    major: u32,
    minor: u32,
}

impl PhpVersion {
    /// Create a version from its components.
    #[must_use]
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Keep the first two dot-separated components of a version string.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidPhpVersion`] unless the string starts
    /// with two numeric components.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::platform::php::PhpVersion;
    ///
    /// let version = PhpVersion::parse("8.3.10-whatever").expect("valid");
    /// assert_eq!(version.to_string(), "8.3");
    /// ```
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || BuilderError::InvalidPhpVersion {
            output: raw.to_owned(),
        };
        let mut parts = raw.trim().split('.');
        let major = parts.next().and_then(parse_component).ok_or_else(invalid)?;
        let minor = parts.next().and_then(parse_component).ok_or_else(invalid)?;
        Ok(Self { major, minor })
    }

    /// Ask `php-config` for the version being built against.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::CommandFailed`] if `php-config` fails, or
    /// [`BuilderError::InvalidPhpVersion`] if its output is not a version.
    pub fn detect(executor: &dyn CommandExecutor) -> Result<Self> {
        info!("Detecting php version...");
        Self::parse(&stdout_of(executor, "php-config", &["--version"])?)
    }

    /// Major component.
    #[must_use]
    pub const fn major(self) -> u32 {
        self.major
    }

    /// Minor component.
    #[must_use]
    pub const fn minor(self) -> u32 {
        self.minor
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

fn parse_component(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Compile-time flags of the interpreter that change the extension ABI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BuildFlags {
    /// PHP was built with `--enable-debug`.
    pub debug: bool,
    /// PHP was built with thread safety (ZTS).
    pub zts: bool,
}

impl BuildFlags {
    /// Probe the interpreter at `php_binary` for its debug and ZTS flags.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::CommandFailed`] if the interpreter fails, or
    /// [`BuilderError::UnexpectedProbeOutput`] if a probe prints something
    /// other than its flag or nothing.
    pub fn detect(executor: &dyn CommandExecutor, php_binary: &str) -> Result<Self> {
        info!("Detecting Zend debug mode...");
        let debug = probe_flag(executor, php_binary, "debug", DEBUG_PROBE, DEBUG_SUFFIX)?;
        info!("Detecting Zend thread safety mode...");
        let zts = probe_flag(executor, php_binary, "zts", ZTS_PROBE, ZTS_SUFFIX)?;
        Ok(Self { debug, zts })
    }

    /// `-debug` for debug builds, empty otherwise.
    #[must_use]
    pub const fn debug_suffix(self) -> &'static str {
        if self.debug { DEBUG_SUFFIX } else { "" }
    }

    /// `-zts` for thread-safe builds, empty otherwise.
    #[must_use]
    pub const fn zts_suffix(self) -> &'static str {
        if self.zts { ZTS_SUFFIX } else { "" }
    }
}

fn probe_flag(
    executor: &dyn CommandExecutor,
    php_binary: &str,
    probe: &'static str,
    script: &str,
    flag: &str,
) -> Result<bool> {
    let output = stdout_of(executor, php_binary, &["-n", "-r", script])?;
    if output.is_empty() {
        Ok(false)
    } else if output == flag {
        Ok(true)
    } else {
        Err(BuilderError::UnexpectedProbeOutput { probe, output })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{ExpectedCall, StubExecutor, failure_output, stdout_output};
    use rstest::rstest;

    fn php_config(arg: &'static str, stdout: &str) -> ExpectedCall {
        ExpectedCall {
            cmd: "php-config",
            args: vec![arg],
            result: Ok(stdout_output(stdout)),
        }
    }

    fn probe(binary: &'static str, script: &'static str, stdout: &str) -> ExpectedCall {
        ExpectedCall {
            cmd: binary,
            args: vec!["-n", "-r", script],
            result: Ok(stdout_output(stdout)),
        }
    }

    #[rstest]
    #[case::suffixed("8.3.10-whatever\n", "8.3")]
    #[case::plain("7.4.0", "7.4")]
    #[case::two_parts("8.4", "8.4")]
    #[case::double_digit_minor("8.10.1", "8.10")]
    fn version_keeps_major_and_minor(#[case] raw: &str, #[case] expected: &str) {
        assert_eq!(PhpVersion::parse(raw).expect("valid").to_string(), expected);
    }

    #[rstest]
    #[case::empty("")]
    #[case::major_only("8")]
    #[case::non_numeric("eight.three")]
    #[case::suffix_on_minor("8.3-dev")]
    fn version_rejects_malformed(#[case] raw: &str) {
        let err = PhpVersion::parse(raw).expect_err("malformed");
        assert!(matches!(err, BuilderError::InvalidPhpVersion { .. }));
    }

    #[test]
    fn version_detect_reads_php_config() {
        let executor = StubExecutor::new(vec![php_config("--version", "8.3.10-whatever\n")]);

        let version = PhpVersion::detect(&executor).expect("detected");

        assert_eq!(version, PhpVersion::new(8, 3));
        executor.assert_finished();
    }

    #[test]
    fn php_binary_returns_reported_path() {
        let executor = StubExecutor::new(vec![php_config("--php-binary", "/usr/bin/php8.3\n")]);

        assert_eq!(php_binary(&executor).expect("found"), "/usr/bin/php8.3");
    }

    #[test]
    fn php_binary_falls_back_on_none_sentinel() {
        let executor = StubExecutor::new(vec![php_config("--php-binary", "NONE\n")]);

        assert_eq!(php_binary(&executor).expect("fallback"), DEFAULT_PHP_BINARY);
    }

    #[test]
    fn php_binary_propagates_php_config_failure() {
        let executor = StubExecutor::new(vec![ExpectedCall {
            cmd: "php-config",
            args: vec!["--php-binary"],
            result: Ok(failure_output("boom")),
        }]);

        let err = php_binary(&executor).expect_err("failure");
        assert!(matches!(err, BuilderError::CommandFailed { .. }));
    }

    #[rstest]
    #[case::release_nts("", "", BuildFlags { debug: false, zts: false })]
    #[case::debug_nts("-debug", "", BuildFlags { debug: true, zts: false })]
    #[case::release_zts("", "-zts\n", BuildFlags { debug: false, zts: true })]
    #[case::debug_zts("-debug", "-zts", BuildFlags { debug: true, zts: true })]
    fn build_flags_follow_probe_output(
        #[case] debug_out: &str,
        #[case] zts_out: &str,
        #[case] expected: BuildFlags,
    ) {
        let executor = StubExecutor::new(vec![
            probe("/usr/bin/php", DEBUG_PROBE, debug_out),
            probe("/usr/bin/php", ZTS_PROBE, zts_out),
        ]);

        let flags = BuildFlags::detect(&executor, "/usr/bin/php").expect("probed");

        assert_eq!(flags, expected);
        executor.assert_finished();
    }

    #[test]
    fn build_flags_reject_unexpected_output() {
        let executor = StubExecutor::new(vec![probe(
            "php",
            DEBUG_PROBE,
            "PHP Warning: something odd",
        )]);

        let err = BuildFlags::detect(&executor, "php").expect_err("unexpected output");

        assert!(matches!(
            err,
            BuilderError::UnexpectedProbeOutput { probe: "debug", .. }
        ));
    }

    #[test]
    fn suffixes_render_flags() {
        let flags = BuildFlags {
            debug: true,
            zts: true,
        };
        assert_eq!(flags.debug_suffix(), "-debug");
        assert_eq!(flags.zts_suffix(), "-zts");
        assert_eq!(BuildFlags::default().debug_suffix(), "");
        assert_eq!(BuildFlags::default().zts_suffix(), "");
    }
}

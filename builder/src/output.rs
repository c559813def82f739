//! Step outputs and terminal messages.

use crate::error::{BuilderError, Result};
use camino::Utf8Path;
use std::fs::OpenOptions;
use std::io::Write;

/// Output name carrying the package filename.
pub const PACKAGE_PATH_OUTPUT: &str = "package-path";

/// Record a step output as `name=value`.
///
/// The line is appended to `github_output` when set, otherwise written to
/// `stdout`.
///
/// # Errors
///
/// Returns [`BuilderError::OutputWriteFailed`] if the line cannot be written.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::output::write_output;
///
/// let mut stdout = Vec::new();
/// write_output(None, &mut stdout, "package-path", "php_foo.zip").expect("written");
/// assert_eq!(String::from_utf8(stdout).expect("utf-8"), "package-path=php_foo.zip\n");
/// ```
pub fn write_output(
    github_output: Option<&Utf8Path>,
    stdout: &mut dyn Write,
    name: &str,
    value: &str,
) -> Result<()> {
    let line = format!("{name}={value}");
    match github_output {
        Some(path) => OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| writeln!(file, "{line}"))
            .map_err(|source| BuilderError::OutputWriteFailed {
                target: path.to_string(),
                source,
            }),
        None => writeln!(stdout, "{line}").map_err(|source| BuilderError::OutputWriteFailed {
            target: "stdout".to_owned(),
            source,
        }),
    }
}

/// Writes a line to stderr, ignoring failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}

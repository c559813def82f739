//! A `log` backend that speaks GitHub Actions workflow commands.
//!
//! Info records print as plain lines, warnings and errors as `::warning::`
//! and `::error::` annotations, and debug/trace records as `::debug::` lines
//! that the runner only shows when step debugging is enabled. Everything goes
//! to stderr so stdout stays free for step outputs.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;

/// Logger rendering records as workflow commands.
#[derive(Debug, Clone, Copy)]
pub struct ActionsLogger {
    level: LevelFilter,
}

impl ActionsLogger {
    /// Create a logger emitting records at or above `level`.
    #[must_use]
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ActionsLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), &record.args().to_string());
        let mut stderr = std::io::stderr().lock();
        if writeln!(stderr, "{line}").is_err() {
            // Nowhere left to report a failing stderr.
        }
    }

    fn flush(&self) {
        if std::io::stderr().flush().is_err() {
            // As above.
        }
    }
}

/// Install an [`ActionsLogger`] as the global logger.
///
/// # Errors
///
/// Returns [`SetLoggerError`] if a logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ActionsLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

/// Render one record as a workflow command line.
///
/// # Examples
///
/// ```
/// use log::Level;
/// use pie_ext_builder::logging::format_record;
///
/// assert_eq!(format_record(Level::Info, "Building extension..."), "Building extension...");
/// assert_eq!(format_record(Level::Warn, "50% done"), "::warning::50%25 done");
/// ```
#[must_use]
pub fn format_record(level: Level, message: &str) -> String {
    match level {
        Level::Info => message.to_owned(),
        Level::Warn => format!("::warning::{}", escape_data(message)),
        Level::Error => format!("::error::{}", escape_data(message)),
        Level::Debug | Level::Trace => format!("::debug::{}", escape_data(message)),
    }
}

/// Escape a workflow command payload so multi-line messages stay intact.
#[must_use]
pub fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

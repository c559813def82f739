//! Operating system vocabulary for package filenames.

use crate::error::{BuilderError, Result};
use std::fmt;

/// An operating system PIE publishes binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatingSystem {
    /// Linux, any distribution.
    Linux,
    /// macOS.
    Darwin,
}

impl OperatingSystem {
    /// Map a host OS identifier to its PIE name.
    ///
    /// `macos` (Rust) and `darwin` (Node) both map to [`Self::Darwin`].
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnsupportedOperatingSystem`] for any other OS.
    pub fn from_host(identifier: &str) -> Result<Self> {
        match identifier {
            "linux" => Ok(Self::Linux),
            "darwin" | "macos" => Ok(Self::Darwin),
            // aix, freebsd, openbsd, sunos and windows are not supported yet
            other => Err(BuilderError::UnsupportedOperatingSystem {
                os: other.to_owned(),
            }),
        }
    }

    /// Return the filename fragment for this operating system.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Darwin => "darwin",
        }
    }
}

impl fmt::Display for OperatingSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

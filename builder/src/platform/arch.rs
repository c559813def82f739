//! CPU architecture vocabulary for package filenames.

use crate::error::{BuilderError, Result};
use std::fmt;

/// An architecture PIE publishes binaries for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    /// 64-bit x86.
    X86_64,
    /// 64-bit ARM.
    Arm64,
    /// 32-bit x86.
    X86,
}

impl Architecture {
    /// Map a host architecture identifier to its PIE name.
    ///
    /// Both the Rust (`x86_64`, `aarch64`, `x86`) and Node (`x64`, `arm64`,
    /// `ia32`) spellings are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::UnsupportedArchitecture`] for anything else.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::platform::arch::Architecture;
    ///
    /// let arch = Architecture::from_host("aarch64").expect("supported");
    /// assert_eq!(arch.as_str(), "arm64");
    /// ```
    pub fn from_host(identifier: &str) -> Result<Self> {
        match identifier {
            "x64" | "x86_64" => Ok(Self::X86_64),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            "ia32" | "x86" => Ok(Self::X86),
            other => Err(BuilderError::UnsupportedArchitecture {
                arch: other.to_owned(),
            }),
        }
    }

    /// Return the filename fragment for this architecture.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Arm64 => "arm64",
            Self::X86 => "x86",
        }
    }
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//! Platform inspection for package naming.
//!
//! Each fact is resolved independently and normalised into the fixed
//! vocabulary PIE uses when it looks for a prebuilt binary:
//!
//! - [`arch`] - CPU architecture (`x86_64`, `arm64`, `x86`).
//! - [`os`] - operating system (`linux`, `darwin`).
//! - [`libc`] - C library flavour (`glibc`, `musl`, `bsdlibc`).
//! - [`php`] - interpreter `major.minor` version and debug/ZTS flags.

pub mod arch;
pub mod libc;
pub mod os;
pub mod php;

use crate::error::Result;
use crate::exec::CommandExecutor;
use self::arch::Architecture;
use self::libc::LibcFlavour;
use self::os::OperatingSystem;
use self::php::{BuildFlags, PhpVersion};
use log::info;

/// Raw host identifiers, before mapping into PIE's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform<'a> {
    /// CPU architecture identifier (e.g. `x86_64`).
    pub arch: &'a str,
    /// Operating system identifier (e.g. `linux`).
    pub os: &'a str,
}

impl HostPlatform<'static> {
    /// The platform this binary was compiled for.
    #[must_use]
    pub const fn current() -> Self {
        Self {
            arch: std::env::consts::ARCH,
            os: std::env::consts::OS,
        }
    }
}

/// Everything about the build platform that goes into a package filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlatformProfile {
    /// CPU architecture.
    pub architecture: Architecture,
    /// Operating system.
    pub operating_system: OperatingSystem,
    /// C library flavour.
    pub libc: LibcFlavour,
    /// PHP `major.minor` version.
    pub php_version: PhpVersion,
    /// Debug and thread-safety flags of the interpreter.
    pub build_flags: BuildFlags,
}

impl PlatformProfile {
    /// Inspect the host and the PHP installation on `PATH`.
    ///
    /// # Errors
    ///
    /// Returns the first failing query's error: an unsupported architecture or
    /// operating system, a failing `php-config`/interpreter probe, or output
    /// that cannot be mapped.
    pub fn detect(host: HostPlatform<'_>, executor: &dyn CommandExecutor) -> Result<Self> {
        let php_binary = php::php_binary(executor)?;
        let php_version = PhpVersion::detect(executor)?;

        info!("Detecting architecture...");
        let architecture = Architecture::from_host(host.arch)?;
        info!("Detecting operating system...");
        let operating_system = OperatingSystem::from_host(host.os)?;

        let libc = LibcFlavour::detect(operating_system, executor)?;
        let build_flags = BuildFlags::detect(executor, &php_binary)?;

        Ok(Self {
            architecture,
            operating_system,
            libc,
            php_version,
            build_flags,
        })
    }
}

//! Package naming policy for PIE release assets.
//!
//! PIE looks for prebuilt binaries attached to a release under a
//! deterministic name:
//! `php_<ext>-<tag>_php<major.minor>-<arch>-<os>-<libc>[-debug][-zts].zip`.

use crate::error::{BuilderError, Result};
use crate::extension_name::ExtensionName;
use crate::platform::PlatformProfile;
use std::fmt;

/// The fixed prefix for all package names.
const PACKAGE_PREFIX: &str = "php_";

/// The fixed file extension for packages.
const PACKAGE_EXTENSION: &str = ".zip";

/// The exact tag of a release the package is attached to.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::naming::ReleaseTag;
///
/// let tag = ReleaseTag::try_from("1.0.0").expect("non-empty");
/// assert_eq!(tag.as_str(), "1.0.0");
/// assert!(ReleaseTag::try_from("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReleaseTag(String);

impl ReleaseTag {
    /// Return the tag as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for ReleaseTag {
    type Error = BuilderError;

    fn try_from(value: &str) -> Result<Self> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(BuilderError::MissingInput {
                name: "release-tag",
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl fmt::Display for ReleaseTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A fully-qualified package filename.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::extension_name::ExtensionName;
/// use pie_ext_builder::naming::{PackageName, ReleaseTag};
/// use pie_ext_builder::platform::PlatformProfile;
/// use pie_ext_builder::platform::arch::Architecture;
/// use pie_ext_builder::platform::libc::LibcFlavour;
/// use pie_ext_builder::platform::os::OperatingSystem;
/// use pie_ext_builder::platform::php::{BuildFlags, PhpVersion};
///
/// let profile = PlatformProfile {
///     architecture: Architecture::X86_64,
///     operating_system: OperatingSystem::Linux,
///     libc: LibcFlavour::Glibc,
///     php_version: PhpVersion::new(8, 3),
///     build_flags: BuildFlags::default(),
/// };
/// let name = PackageName::new(
///     ExtensionName::try_from("test_ext").expect("valid"),
///     ReleaseTag::try_from("1.0.0").expect("valid"),
///     profile,
/// );
/// assert_eq!(name.to_string(), "php_test_ext-1.0.0_php8.3-x86_64-linux-glibc.zip");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageName {
    extension: ExtensionName,
    release_tag: ReleaseTag,
    profile: PlatformProfile,
}

impl PackageName {
    /// Create a package name from validated components.
    #[must_use]
    pub fn new(extension: ExtensionName, release_tag: ReleaseTag, profile: PlatformProfile) -> Self {
        Self {
            extension,
            release_tag,
            profile,
        }
    }

    /// Return the extension component.
    #[must_use]
    pub fn extension(&self) -> &ExtensionName {
        &self.extension
    }

    /// Return the release tag component.
    #[must_use]
    pub fn release_tag(&self) -> &ReleaseTag {
        &self.release_tag
    }

    /// Return the platform component.
    #[must_use]
    pub fn profile(&self) -> &PlatformProfile {
        &self.profile
    }

    /// Return the filename as a string without consuming the value.
    #[must_use]
    pub fn filename(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.profile;
        write!(
            f,
            "{PACKAGE_PREFIX}{}-{}_php{}-{}-{}-{}{}{}{PACKAGE_EXTENSION}",
            self.extension,
            self.release_tag,
            p.php_version,
            p.architecture,
            p.operating_system,
            p.libc,
            p.build_flags.debug_suffix(),
            p.build_flags.zts_suffix(),
        )
    }
}

/// The names derived for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    /// The release the package is attached to.
    pub release_tag: ReleaseTag,
    /// The file `make` leaves under `modules/`.
    pub shared_object_filename: String,
    /// The zip filename uploaded to the release.
    pub package_filename: String,
}

impl ArtifactDescriptor {
    /// Derive every filename for the given extension, tag and platform.
    #[must_use]
    pub fn new(extension: &ExtensionName, release_tag: &ReleaseTag, profile: PlatformProfile) -> Self {
        let package = PackageName::new(extension.clone(), release_tag.clone(), profile);
        Self {
            release_tag: release_tag.clone(),
            shared_object_filename: extension.shared_object_filename(),
            package_filename: package.filename(),
        }
    }
}

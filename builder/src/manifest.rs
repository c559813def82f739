//! Package manifest decoding and extension identity resolution.
//!
//! A PIE package describes itself in `composer.json`. Only three fields
//! matter here: the package `type`, the optional `php-ext.extension-name`
//! override, and the `vendor/package` `name` used as a fallback.

use crate::error::{BuilderError, Result};
use crate::extension_name::ExtensionName;
use camino::Utf8Path;
use log::info;
use serde::Deserialize;
use serde_json::Value;

/// The default manifest filename, relative to the working directory.
pub const MANIFEST_FILE: &str = "composer.json";

/// Package types PIE treats as PHP extensions.
pub const EXTENSION_PACKAGE_TYPES: &[&str] = &["php-ext", "php-ext-zend"];

/// Marker some tooling writes for an absent value.
const NULL_MARKER: &str = "null";

/// The subset of `composer.json` needed to identify an extension.
///
/// Fields are kept as raw JSON so a value of the wrong JSON type reaches the
/// type and name checks instead of failing the decode.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ComposerManifest {
    /// Composer package type.
    #[serde(rename = "type")]
    pub package_type: Option<Value>,
    /// Package name in `vendor/package` form.
    pub name: Option<Value>,
    /// PIE-specific extension metadata.
    #[serde(rename = "php-ext")]
    pub php_ext: Option<PhpExtSection>,
}

/// The `php-ext` block of a PIE manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhpExtSection {
    /// Explicit extension name, overriding the package name.
    #[serde(rename = "extension-name")]
    pub extension_name: Option<Value>,
}

impl ComposerManifest {
    /// Read and decode the manifest at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::ManifestMissing`] when the file does not exist,
    /// [`BuilderError::InvalidManifest`] when it is not valid JSON, or
    /// [`BuilderError::Io`] when it cannot be read.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        if !path.exists() {
            return Err(BuilderError::ManifestMissing {
                path: path.to_owned(),
            });
        }
        let contents = std::fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| BuilderError::InvalidManifest {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Resolve and validate the extension name declared by this manifest.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidManifestType`] for non-extension
    /// packages, [`BuilderError::NameMissing`] when no name can be found, and
    /// [`BuilderError::InvalidExtensionName`] when the resolved name fails
    /// validation.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::manifest::ComposerManifest;
    ///
    /// let manifest: ComposerManifest =
    ///     serde_json::from_str(r#"{"type":"php-ext","name":"foo/bar"}"#).expect("json");
    /// assert_eq!(manifest.extension_name().expect("valid").as_str(), "bar");
    /// ```
    pub fn extension_name(&self) -> Result<ExtensionName> {
        self.ensure_extension_type()?;

        let candidate = match self.declared_extension_name() {
            Some(name) => name,
            None => {
                info!(".php-ext.extension-name not found in composer.json, falling back to package name...");
                self.package_short_name().ok_or(BuilderError::NameMissing)?
            }
        };

        ExtensionName::from_candidate(&candidate)
    }

    fn ensure_extension_type(&self) -> Result<()> {
        match rendered(self.package_type.as_ref()) {
            Some(found) if EXTENSION_PACKAGE_TYPES.contains(&found.as_str()) => Ok(()),
            found => Err(BuilderError::InvalidManifestType {
                found: found.unwrap_or_else(|| NULL_MARKER.to_owned()),
            }),
        }
    }

    fn declared_extension_name(&self) -> Option<String> {
        self.php_ext
            .as_ref()
            .and_then(|section| present(rendered(section.extension_name.as_ref())))
    }

    /// Everything after the last `/` of the package name.
    fn package_short_name(&self) -> Option<String> {
        present(rendered(self.name.as_ref()))
            .and_then(|name| name.rsplit('/').next().map(str::to_owned))
    }
}

/// Resolve the extension name from the manifest at `path`.
///
/// # Errors
///
/// Propagates every error from [`ComposerManifest::load`] and
/// [`ComposerManifest::extension_name`].
pub fn resolve_extension_name(path: &Utf8Path) -> Result<ExtensionName> {
    info!("Detecting extension name from {path}...");
    ComposerManifest::load(path)?.extension_name()
}

/// Text of a manifest value: strings trimmed, other values as their JSON
/// text, `null` as absent.
fn rendered(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text.trim().to_owned()),
        other => Some(other.to_string()),
    }
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != NULL_MARKER)
}

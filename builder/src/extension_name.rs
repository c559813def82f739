//! Extension name newtype.
//!
//! PIE accepts extension names matching `^[A-Za-z][A-Za-z0-9_]+$`: an ASCII
//! letter followed by at least one ASCII letter, digit or underscore.

use crate::error::{BuilderError, Result};
use std::fmt;

/// The prefix PIE strips from extension names (`ext-redis` → `redis`).
pub const EXT_PREFIX: &str = "ext-";

/// A validated PHP extension name.
///
/// # Examples
///
/// ```
/// use pie_ext_builder::extension_name::ExtensionName;
///
/// let name = ExtensionName::try_from("test_ext").expect("valid name");
/// assert_eq!(name.as_str(), "test_ext");
/// assert_eq!(name.shared_object_filename(), "test_ext.so");
///
/// assert!(ExtensionName::try_from("1abc").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtensionName(String);

impl ExtensionName {
    /// Build a name from a raw candidate, stripping one leading `ext-`.
    ///
    /// # Errors
    ///
    /// Returns [`BuilderError::InvalidExtensionName`] carrying the stripped
    /// value when it does not match the naming grammar.
    ///
    /// # Examples
    ///
    /// ```
    /// use pie_ext_builder::extension_name::ExtensionName;
    ///
    /// let name = ExtensionName::from_candidate("ext-redis").expect("valid");
    /// assert_eq!(name.as_str(), "redis");
    /// ```
    pub fn from_candidate(candidate: &str) -> Result<Self> {
        let stripped = candidate.strip_prefix(EXT_PREFIX).unwrap_or(candidate);
        Self::try_from(stripped)
    }

    /// Return the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Return the filename `make` produces for this extension.
    #[must_use]
    pub fn shared_object_filename(&self) -> String {
        format!("{}.so", self.0)
    }
}

impl TryFrom<&str> for ExtensionName {
    type Error = BuilderError;

    fn try_from(value: &str) -> Result<Self> {
        if is_valid_extension_name(value) {
            Ok(Self(value.to_owned()))
        } else {
            Err(BuilderError::InvalidExtensionName {
                name: value.to_owned(),
            })
        }
    }
}

impl TryFrom<String> for ExtensionName {
    type Error = BuilderError;

    fn try_from(value: String) -> Result<Self> {
        if is_valid_extension_name(&value) {
            Ok(Self(value))
        } else {
            Err(BuilderError::InvalidExtensionName { name: value })
        }
    }
}

impl AsRef<str> for ExtensionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExtensionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn is_valid_extension_name(value: &str) -> bool {
    let mut chars = value.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    let rest = chars.as_str();
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

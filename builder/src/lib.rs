//! PIE extension binary builder library.
//!
//! This crate builds a PHP extension from source, packages the resulting
//! shared object under the filename PIE looks for on this platform, and
//! attaches it to an existing GitHub release. It is used by the
//! `pie-ext-builder` binary and can be consumed programmatically for testing.
//!
//! # Modules
//!
//! - [`builder`] - `phpize`/`configure`/`make` build driver
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Validated run configuration
//! - [`error`] - Semantic error types
//! - [`exec`] - External command execution abstraction
//! - [`extension_name`] - Validated extension name newtype
//! - [`logging`] - GitHub Actions workflow-command logger
//! - [`manifest`] - `composer.json` decoding and extension identity
//! - [`naming`] - Package filename policy
//! - [`output`] - Step outputs and terminal messages
//! - [`packaging`] - Zip packaging of the shared object
//! - [`pipeline`] - Build-and-publish orchestration
//! - [`platform`] - Architecture, OS, libc and PHP inspection
//! - [`release`] - Release lookup and asset upload

pub mod builder;
pub mod cli;
pub mod config;
pub mod error;
pub mod exec;
pub mod extension_name;
pub mod logging;
pub mod manifest;
pub mod naming;
pub mod output;
pub mod packaging;
pub mod pipeline;
pub mod platform;
pub mod release;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;

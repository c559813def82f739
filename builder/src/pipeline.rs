//! Build-and-publish pipeline orchestration.
//!
//! Coordinates the manifest, platform inspection, naming, build, packaging
//! and release modules into one sequential run. Every failure aborts the run;
//! the upload is the last side effect.

use crate::builder::ExtensionBuilder;
use crate::config::RunConfig;
use crate::error::Result;
use crate::exec::CommandExecutor;
use crate::manifest::resolve_extension_name;
use crate::naming::ArtifactDescriptor;
use crate::output::{PACKAGE_PATH_OUTPUT, write_output};
use crate::packaging::{MODULES_DIR, list_modules, package_shared_object};
use crate::platform::{HostPlatform, PlatformProfile};
use crate::release::{ReleaseClient, publish_asset};
use camino::Utf8Path;
use log::info;
use std::io::Write;

/// What to do once the package name is known.
#[derive(Clone, Copy)]
pub enum ReleaseMode<'a> {
    /// Stop after naming; nothing is built or uploaded.
    DryRun,
    /// Build, package and upload through the given client.
    Publish(&'a dyn ReleaseClient),
}

/// Collaborators for a pipeline run.
pub struct PipelineContext<'a> {
    /// Runs probes and build steps. Build steps and the `modules` listing
    /// use relative paths, so it must run commands in `working_dir`.
    pub executor: &'a dyn CommandExecutor,
    /// Host identifiers to map into PIE's vocabulary.
    pub host: HostPlatform<'a>,
    /// Directory holding the extension sources. The manifest, the shared
    /// object and the package are resolved against it.
    pub working_dir: &'a Utf8Path,
    /// Dry run or publish.
    pub mode: ReleaseMode<'a>,
}

/// Build the extension, package it and attach it to the release.
///
/// Returns the descriptor of the package that was (or, in a dry run, would
/// have been) published. The `package-path` output is written in both modes.
///
/// # Errors
///
/// Returns the first error raised by any step.
pub fn run_release(
    config: &RunConfig,
    context: &PipelineContext<'_>,
    stdout: &mut dyn Write,
) -> Result<ArtifactDescriptor> {
    let extension = resolve_extension_name(&context.working_dir.join(&config.manifest))?;
    info!("Extension name: {extension}");

    let profile = PlatformProfile::detect(context.host, context.executor)?;
    let descriptor = ArtifactDescriptor::new(&extension, &config.release_tag, profile);
    info!("Package name: {}", descriptor.package_filename);

    match context.mode {
        ReleaseMode::DryRun => {
            info!(
                "Dry run: skipping build and upload of {} to release {}",
                descriptor.package_filename, descriptor.release_tag
            );
        }
        ReleaseMode::Publish(releases) => {
            ExtensionBuilder::new(context.executor).build(&config.configure_flags)?;

            list_modules(context.executor);
            let shared_object = context
                .working_dir
                .join(MODULES_DIR)
                .join(&descriptor.shared_object_filename);
            let package_path = context.working_dir.join(&descriptor.package_filename);
            package_shared_object(&shared_object, &package_path)?;

            publish_asset(releases, &descriptor.release_tag, &package_path)?;
            info!(
                "Uploaded {} to release {}",
                descriptor.package_filename, descriptor.release_tag
            );
        }
    }

    write_output(
        config.github_output.as_deref(),
        stdout,
        PACKAGE_PATH_OUTPUT,
        &descriptor.package_filename,
    )?;
    Ok(descriptor)
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

//! PIE extension builder CLI entrypoint.
//!
//! Builds the extension in the current directory, packages it for PIE and
//! attaches it to the release named by `--release-tag`.

use camino::Utf8Path;
use clap::Parser;
use log::warn;
use pie_ext_builder::cli::Cli;
use pie_ext_builder::config::{RunConfig, TOKEN_FALLBACK_ENV};
use pie_ext_builder::error::Result;
use pie_ext_builder::exec::SystemCommandExecutor;
use pie_ext_builder::logging::{self, escape_data};
use pie_ext_builder::output::write_stderr_line;
use pie_ext_builder::pipeline::{PipelineContext, ReleaseMode, run_release};
use pie_ext_builder::platform::HostPlatform;
use pie_ext_builder::release::{GitHubReleases, ReleaseClient};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    if let Err(err) = logging::init(cli.log_level()) {
        write_stderr_line(&mut stderr, format!("::warning::{err}"));
    }
    let run_result = run(&cli, &mut std::io::stdout());
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = RunConfig::from_cli(cli, std::env::var(TOKEN_FALLBACK_ENV).ok())?;
    if config.is_dry_run() {
        warn!("Dry run: the extension will not be built or uploaded");
    }

    let client = config.publish.as_ref().map(|target| {
        GitHubReleases::new(
            &target.api_url,
            &target.uploads_url,
            target.repository.clone(),
            target.token.clone(),
        )
    });
    let mode = match &client {
        Some(client) => ReleaseMode::Publish(client as &dyn ReleaseClient),
        None => ReleaseMode::DryRun,
    };

    let working_dir = Utf8Path::new(".");
    let executor = SystemCommandExecutor::in_dir(working_dir);
    let context = PipelineContext {
        executor: &executor,
        host: HostPlatform::current(),
        working_dir,
        mode,
    };
    run_release(&config, &context, stdout)?;
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format!("::error::{}", escape_data(&err.to_string())));
            1
        }
    }
}

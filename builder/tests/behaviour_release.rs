//! Behaviour-driven tests for the build-and-publish pipeline.
//!
//! Scenarios run the whole pipeline in a temporary package directory with
//! scripted commands and an in-memory release client.

use camino::Utf8PathBuf;
use pie_ext_builder::builder::ConfigureFlags;
use pie_ext_builder::config::{PublishTarget, RunConfig};
use pie_ext_builder::error::BuilderError;
use pie_ext_builder::naming::ReleaseTag;
use pie_ext_builder::pipeline::{PipelineContext, ReleaseMode, run_release};
use pie_ext_builder::platform::HostPlatform;
use pie_ext_builder::release::Repository;
use pie_ext_builder::test_utils::{
    ExpectedCall, StubExecutor, StubReleases, release, stdout_output,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use serde_json::json;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct ReleaseWorld {
    _dir: TempDir,
    root: Utf8PathBuf,
    built: bool,
    releases: StubReleases,
    release_ids: Vec<(u64, String)>,
    stdout: Vec<u8>,
    result: Option<Result<(), BuilderError>>,
}

impl ReleaseWorld {
    fn expected_calls(&self) -> Vec<ExpectedCall> {
        let mut calls = vec![
            answer("php-config", vec!["--php-binary"], "php"),
            answer("php-config", vec!["--version"], "8.3.4"),
            answer("ldd", vec!["--version"], "ldd (GNU libc) 2.39"),
            answer("php", vec!["-n", "-r", "echo PHP_DEBUG ? '-debug' : '';"], ""),
            answer("php", vec!["-n", "-r", "echo ZEND_THREAD_SAFE ? '-zts' : '';"], ""),
        ];
        if self.built {
            calls.extend([
                answer("phpize", vec![], ""),
                answer("./configure", vec![], ""),
                answer("make", vec![], ""),
                answer("ls", vec!["-l", "modules"], "bar.so"),
            ]);
        }
        calls
    }

    fn run(&mut self, tag: &str, dry_run: bool) {
        let executor = StubExecutor::new(self.expected_calls());
        let config = RunConfig {
            release_tag: ReleaseTag::try_from(tag).expect("valid tag"),
            configure_flags: ConfigureFlags::default(),
            manifest: Utf8PathBuf::from("composer.json"),
            github_output: None,
            publish: (!dry_run).then(|| PublishTarget {
                api_url: "https://api.github.com".to_owned(),
                uploads_url: "https://uploads.github.com".to_owned(),
                repository: Repository::parse("foo/bar").expect("valid repository"),
                token: "token".to_owned(),
            }),
        };
        let mode = if dry_run {
            ReleaseMode::DryRun
        } else {
            ReleaseMode::Publish(&self.releases)
        };
        let context = PipelineContext {
            executor: &executor,
            host: HostPlatform {
                arch: "x86_64",
                os: "linux",
            },
            working_dir: &self.root,
            mode,
        };
        self.result = Some(run_release(&config, &context, &mut self.stdout).map(|_| ()));
    }
}

fn answer(cmd: &'static str, args: Vec<&'static str>, stdout: &str) -> ExpectedCall {
    ExpectedCall {
        cmd,
        args,
        result: Ok(stdout_output(stdout)),
    }
}

#[fixture]
fn world() -> ReleaseWorld {
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    ReleaseWorld {
        _dir: dir,
        root,
        built: false,
        releases: StubReleases::default(),
        release_ids: Vec::new(),
        stdout: Vec::new(),
        result: None,
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

fn write_manifest(world: &ReleaseWorld, package: &str) {
    let manifest = json!({ "type": "php-ext", "name": package });
    std::fs::write(world.root.join("composer.json"), manifest.to_string()).expect("write manifest");
}

#[given("an extension package \"{package}\" with a built shared object")]
fn given_built_package(world: &mut ReleaseWorld, package: String) {
    write_manifest(world, &package);
    let modules = world.root.join("modules");
    std::fs::create_dir_all(&modules).expect("create modules");
    let short_name = package.rsplit('/').next().expect("package name");
    std::fs::write(modules.join(format!("{short_name}.so")), b"\x7fELF").expect("write so");
    world.built = true;
}

#[given("an extension package \"{package}\" without a build")]
fn given_unbuilt_package(world: &mut ReleaseWorld, package: String) {
    write_manifest(world, &package);
}

#[given("the repository has releases \"{tags}\"")]
fn given_releases(world: &mut ReleaseWorld, tags: String) {
    world.release_ids = tags
        .split(',')
        .zip(1u64..)
        .map(|(tag, id)| (id, tag.to_owned()))
        .collect();
    world.releases = StubReleases::new(
        world
            .release_ids
            .iter()
            .map(|(id, tag)| release(*id, tag))
            .collect(),
    );
}

#[when("the pipeline publishes release \"{tag}\"")]
fn when_publishes(world: &mut ReleaseWorld, tag: String) {
    world.run(&tag, false);
}

#[when("the pipeline dry-runs release \"{tag}\"")]
fn when_dry_runs(world: &mut ReleaseWorld, tag: String) {
    world.run(&tag, true);
}

#[then("the package \"{package}\" is uploaded to release \"{tag}\"")]
fn then_uploaded(world: &mut ReleaseWorld, package: String, tag: String) {
    world
        .result
        .as_ref()
        .expect("pipeline ran")
        .as_ref()
        .expect("pipeline succeeded");
    let expected_id = world
        .release_ids
        .iter()
        .find_map(|(id, t)| (*t == tag).then_some(*id))
        .expect("release exists");
    let uploads = world.releases.uploads();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].release_id, expected_id);
    assert_eq!(uploads[0].name, package);
    assert!(!uploads[0].data.is_empty());
}

#[then("the package-path output is \"{package}\"")]
fn then_output(world: &mut ReleaseWorld, package: String) {
    let stdout = String::from_utf8(world.stdout.clone()).expect("utf-8 stdout");
    assert_eq!(stdout, format!("package-path={package}\n"));
}

#[then("the run fails mentioning \"{fragment}\"")]
fn then_fails(world: &mut ReleaseWorld, fragment: String) {
    let result = world.result.as_ref().expect("pipeline ran");
    let message = result.as_ref().expect_err("pipeline should fail").to_string();
    assert!(message.contains(&fragment), "{message}");
}

#[then("nothing is uploaded")]
fn then_nothing_uploaded(world: &mut ReleaseWorld) {
    assert!(world.releases.uploads().is_empty());
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/release_publishing.feature",
    name = "Package is uploaded to the matching release"
)]
fn scenario_upload_to_matching_release(world: ReleaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/release_publishing.feature",
    name = "Unknown release tag"
)]
fn scenario_unknown_release_tag(world: ReleaseWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/release_publishing.feature",
    name = "Dry run derives the name only"
)]
fn scenario_dry_run(world: ReleaseWorld) {
    let _ = world;
}

//! Behaviour-driven tests for platform inspection and package naming.
//!
//! Probe commands are answered by a scripted `StubExecutor`, so the
//! scenarios run without PHP installed.

use pie_ext_builder::error::BuilderError;
use pie_ext_builder::extension_name::ExtensionName;
use pie_ext_builder::naming::{PackageName, ReleaseTag};
use pie_ext_builder::platform::{HostPlatform, PlatformProfile};
use pie_ext_builder::test_utils::{ExpectedCall, StubExecutor, stdout_output};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const PHP_BINARY: &str = "/usr/bin/php";
const DEBUG_PROBE: &str = "echo PHP_DEBUG ? '-debug' : '';";
const ZTS_PROBE: &str = "echo ZEND_THREAD_SAFE ? '-zts' : '';";

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

#[derive(Default)]
struct NamingWorld {
    extension: Option<ExtensionName>,
    tag: Option<ReleaseTag>,
    arch: String,
    os: String,
    ldd_output: Option<String>,
    php_version: String,
    debug: bool,
    zts: bool,
    result: Option<Result<PackageName, BuilderError>>,
}

impl NamingWorld {
    /// Probe answers in the order `PlatformProfile::detect` asks for them.
    fn expected_calls(&self) -> Vec<ExpectedCall> {
        let mut calls = vec![
            answer("php-config", vec!["--php-binary"], PHP_BINARY),
            answer("php-config", vec!["--version"], &self.php_version),
        ];
        if let Some(ldd) = &self.ldd_output {
            calls.push(answer("ldd", vec!["--version"], ldd));
        }
        let debug = if self.debug { "-debug" } else { "" };
        let zts = if self.zts { "-zts" } else { "" };
        calls.push(answer(PHP_BINARY, vec!["-n", "-r", DEBUG_PROBE], debug));
        calls.push(answer(PHP_BINARY, vec!["-n", "-r", ZTS_PROBE], zts));
        calls
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
fn world() -> NamingWorld {
    NamingWorld::default()
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("the extension \"{name}\" at release \"{tag}\"")]
fn given_extension(world: &mut NamingWorld, name: String, tag: String) {
    world.extension = Some(ExtensionName::try_from(name).expect("valid extension name"));
    world.tag = Some(ReleaseTag::try_from(tag.as_str()).expect("valid tag"));
}

#[given("a \"{arch}\" \"{os}\" host whose ldd reports \"{output}\"")]
fn given_linux_host(world: &mut NamingWorld, arch: String, os: String, output: String) {
    world.arch = arch;
    world.os = os;
    world.ldd_output = Some(output);
}

#[given("a \"{arch}\" \"{os}\" host")]
fn given_host(world: &mut NamingWorld, arch: String, os: String) {
    world.arch = arch;
    world.os = os;
}

#[given("PHP \"{version}\" without debug or thread safety")]
fn given_release_php(world: &mut NamingWorld, version: String) {
    world.php_version = version;
}

#[given("PHP \"{version}\" with thread safety")]
fn given_zts_php(world: &mut NamingWorld, version: String) {
    world.php_version = version;
    world.zts = true;
}

#[given("PHP \"{version}\" with debug enabled")]
fn given_debug_php(world: &mut NamingWorld, version: String) {
    world.php_version = version;
    world.debug = true;
}

#[when("the platform is inspected and the package is named")]
fn when_named(world: &mut NamingWorld) {
    let executor = StubExecutor::new(world.expected_calls());
    let host = HostPlatform {
        arch: &world.arch,
        os: &world.os,
    };
    let extension = world.extension.clone().expect("extension set");
    let tag = world.tag.clone().expect("tag set");
    world.result = Some(
        PlatformProfile::detect(host, &executor)
            .map(|profile| PackageName::new(extension, tag, profile)),
    );
}

#[then("the package filename is \"{expected}\"")]
fn then_filename(world: &mut NamingWorld, expected: String) {
    let result = world.result.as_ref().expect("naming attempted");
    let name = result.as_ref().expect("naming succeeded");
    assert_eq!(name.filename(), expected);
}

#[then("naming fails mentioning \"{fragment}\"")]
fn then_naming_fails(world: &mut NamingWorld, fragment: String) {
    let result = world.result.as_ref().expect("naming attempted");
    let message = result.as_ref().expect_err("naming should fail").to_string();
    assert!(message.contains(&fragment), "{message}");
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/package_naming.feature",
    name = "Glibc Linux package name"
)]
fn scenario_glibc_linux(world: NamingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/package_naming.feature",
    name = "Musl Linux package name with thread safety"
)]
fn scenario_musl_linux_zts(world: NamingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/package_naming.feature",
    name = "Debug build on macOS"
)]
fn scenario_debug_macos(world: NamingWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/package_naming.feature",
    name = "Unsupported architecture"
)]
fn scenario_unsupported_architecture(world: NamingWorld) {
    let _ = world;
}

//! Reference scenarios for argument derivation and failure handling.

use std::collections::HashSet;

use stagbuild_lib::ConfigError;
use stagbuild_lib::context::{BuildContext, BuildOptions, CompilerFamily, EnvOverrides};
use stagbuild_lib::dependency::{DependencySpec, FetchError, HttpFetcher};
use stagbuild_lib::execute::{self, BuildError, Stage};
use stagbuild_lib::platform::ArchMap;
use stagbuild_lib::platform::os::Os;
use stagbuild_lib::toolchain::ToolchainConfigurator;

use super::common::{FixedProbe, RecordingInvoker, temp_request};

fn windows_options(tag: &str) -> BuildOptions {
  BuildOptions {
    platform: Some(tag.to_string()),
    compiler: Some(CompilerFamily::Msvc),
    os: Some(Os::Windows),
    interpreter: Some("C:/Python311/python.exe".into()),
    ..Default::default()
  }
}

fn visual_studio_2019() -> EnvOverrides {
  EnvOverrides {
    generator: Some("Visual Studio 16 2019".to_string()),
    ..Default::default()
  }
}

#[test]
fn ninja_dependency_configure() {
  let (_temp, request) = temp_request();
  let options = BuildOptions {
    platform: Some("linux-x86_64".to_string()),
    compiler: Some(CompilerFamily::Default),
    os: Some(Os::Linux),
    ..Default::default()
  };
  let probe = FixedProbe::with(&[("python3", "/usr/bin/python3"), ("ninja", "/opt/ninja/bin/ninja")]);

  let (_, plan) = execute::prepare(&options, EnvOverrides::default(), &probe, &request).unwrap();
  let args = &plan.command(Stage::ConfigureDependency).unwrap().args;

  let generator_flags = args.iter().filter(|a| a.starts_with("-G")).count();
  let driver_flags = args
    .iter()
    .filter(|a| a.starts_with("-DCMAKE_MAKE_PROGRAM:FILEPATH="))
    .count();
  let disable_flags: Vec<&String> = args.iter().filter(|a| a.starts_with("-DBUILD_opencv_")).collect();

  assert_eq!(generator_flags, 1);
  assert_eq!(driver_flags, 1);
  assert_eq!(disable_flags.len(), 6);
  let unique: HashSet<&String> = disable_flags.iter().copied().collect();
  assert_eq!(unique.len(), 6);
}

#[test]
fn visual_studio_2019_on_amd64_selects_x64_once() {
  let probe = FixedProbe::with(&[]);
  let context = BuildContext::derive(&windows_options("win-amd64"), visual_studio_2019(), &probe).unwrap();
  let map = ArchMap::default();

  let args = ToolchainConfigurator::new(&context, &map).common_args().unwrap();

  let position = args.iter().position(|a| a == "-A").unwrap();
  assert_eq!(args.as_slice()[position + 1], "x64");
  assert_eq!(args.iter().filter(|a| a.as_str() == "-A").count(), 1);
}

#[test]
fn unknown_windows_platform_fails_before_any_invocation() {
  let (_temp, request) = temp_request();
  let probe = FixedProbe::with(&[]);

  let result = execute::prepare(&windows_options("win-risc5"), visual_studio_2019(), &probe, &request);

  match result {
    Err(BuildError::Configuration(ConfigError::UnknownPlatform { tag, .. })) => assert_eq!(tag, "win-risc5"),
    other => panic!("expected an unknown platform error, got {:?}", other.map(|_| ())),
  }
  assert!(!request.build_temp.exists());
}

#[test]
fn failed_download_aborts_before_target_build() {
  let mut server = mockito::Server::new();
  let mock = server.mock("GET", "/opencv-4.8.1.zip").with_status(500).create();

  let (_temp, mut request) = temp_request();
  request.dependency = DependencySpec::new(
    "opencv",
    "4.8.1",
    format!("{}/opencv-4.8.1.zip", server.url()),
    ["ts", "stitching", "objdetect", "photo", "ml", "python3"],
  );
  let options = BuildOptions {
    platform: Some("linux-x86_64".to_string()),
    compiler: Some(CompilerFamily::Default),
    os: Some(Os::Linux),
    ..Default::default()
  };
  let probe = FixedProbe::with(&[("python3", "/usr/bin/python3")]);
  let (_, plan) = execute::prepare(&options, EnvOverrides::default(), &probe, &request).unwrap();
  let invoker = RecordingInvoker::succeeding();

  let err = execute::run(&plan, &HttpFetcher::new().unwrap(), &invoker).unwrap_err();

  mock.assert();
  assert!(matches!(err, BuildError::Fetch(FetchError::Status { status: 500, .. })));
  assert_eq!(invoker.call_count(), 0);
  assert_eq!(std::fs::read_dir(&plan.workspace.target_dir).unwrap().count(), 0);
  assert!(!plan.workspace.output_dir.exists());
}

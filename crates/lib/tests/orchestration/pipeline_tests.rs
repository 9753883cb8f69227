//! Stage ordering and failure propagation.

use stagbuild_lib::context::{BuildOptions, CompilerFamily, EnvOverrides};
use stagbuild_lib::execute::{self, BuildError, Stage};
use stagbuild_lib::platform::os::Os;

use super::common::{FixedProbe, LocalFetcher, RecordingInvoker, temp_request};

fn linux_options() -> BuildOptions {
  BuildOptions {
    platform: Some("linux-x86_64".to_string()),
    compiler: Some(CompilerFamily::Default),
    os: Some(Os::Linux),
    ..Default::default()
  }
}

fn probe() -> FixedProbe {
  FixedProbe::with(&[("python3", "/usr/bin/python3"), ("ninja", "/usr/bin/ninja")])
}

#[test]
fn target_configure_follows_dependency_install() {
  let (_temp, request) = temp_request();
  let (_, plan) = execute::prepare(&linux_options(), EnvOverrides::default(), &probe(), &request).unwrap();
  let invoker = RecordingInvoker::succeeding();

  execute::run(&plan, &LocalFetcher, &invoker).unwrap();

  let calls = invoker.calls.borrow();
  let install = calls.iter().position(|c| c.args.first().map(String::as_str) == Some("--install"));
  let target_configure = calls
    .iter()
    .position(|c| c.args.first() == Some(&request.source_root.display().to_string()));
  assert!(install.unwrap() < target_configure.unwrap());
}

#[test]
fn each_failing_stage_stops_the_rest() {
  for (index, stage) in Stage::ALL.iter().enumerate() {
    let (_temp, request) = temp_request();
    let (_, plan) = execute::prepare(&linux_options(), EnvOverrides::default(), &probe(), &request).unwrap();
    let invoker = RecordingInvoker::failing_at(index);

    let err = execute::run(&plan, &LocalFetcher, &invoker).unwrap_err();

    assert_eq!(err.stage(), Some(*stage));
    assert_eq!(invoker.call_count(), index + 1, "stages after {} must not run", stage);
  }
}

#[test]
fn failing_dependency_build_never_configures_target() {
  let (_temp, request) = temp_request();
  let (_, plan) = execute::prepare(&linux_options(), EnvOverrides::default(), &probe(), &request).unwrap();
  let invoker = RecordingInvoker::failing_at(1);

  let err = execute::run(&plan, &LocalFetcher, &invoker).unwrap_err();

  assert!(matches!(err, BuildError::ToolFailed { stage: Stage::BuildDependency, .. }));
  assert!(
    invoker
      .calls
      .borrow()
      .iter()
      .all(|c| c.cwd == plan.workspace.dependency_dir)
  );
}

#[test]
fn parallel_level_env_removes_all_job_flags() {
  let (_temp, request) = temp_request();
  let options = BuildOptions {
    jobs: Some(8),
    ..linux_options()
  };
  let overrides = EnvOverrides {
    parallel_level: Some("4".to_string()),
    ..Default::default()
  };
  let (_, plan) = execute::prepare(&options, overrides, &probe(), &request).unwrap();

  for planned in &plan.stages {
    assert!(
      !planned.command.args.iter().any(|a| a.starts_with("-j")),
      "{} should carry no job flag",
      planned.stage
    );
  }
}

#[test]
fn requested_jobs_reach_both_builds() {
  let (_temp, request) = temp_request();
  let options = BuildOptions {
    jobs: Some(3),
    ..linux_options()
  };
  let (_, plan) = execute::prepare(&options, EnvOverrides::default(), &probe(), &request).unwrap();

  for stage in [Stage::BuildDependency, Stage::BuildTarget] {
    assert_eq!(plan.command(stage).unwrap().args, vec!["--build", ".", "-j3"]);
  }
  assert_eq!(plan.command(Stage::InstallDependency).unwrap().args, vec!["--install", "."]);
}

#[test]
fn malformed_arch_flags_do_not_block_linux_builds() {
  let (_temp, request) = temp_request();
  let overrides = EnvOverrides {
    arch_flags: Some("-arch".to_string()),
    ..Default::default()
  };
  let (_, plan) = execute::prepare(&linux_options(), overrides, &probe(), &request).unwrap();

  let configure = plan.command(Stage::ConfigureTarget).unwrap();
  assert!(!configure.args.iter().any(|a| a.starts_with("-DCMAKE_OSX_ARCHITECTURES")));
}

//! Build pipeline execution.
//!
//! Runs the five stages of a [`BuildPlan`] strictly in order:
//! - configure, build and install the dependency
//! - configure and build the extension against the installed dependency
//!
//! Each stage blocks until its tool exits. The first failure ends the build;
//! later stages never start and nothing already written is rolled back.

pub mod invoke;
pub mod plan;
pub mod types;

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{error, info, warn};

use crate::context::{BuildContext, BuildOptions, EnvOverrides, ToolProbe};
use crate::dependency::{DependencySpec, SourceFetcher};
use crate::workspace::WorkspacePaths;

pub use invoke::{Invocation, Invoker, OutputMode, ProcessInvoker, ToolCommand};
pub use plan::{BuildPlan, BuildRequest, PlannedStage};
pub use types::{BuildError, BuildReport, Stage, StageResult};

/// Derive the context and plan for a request without running anything.
pub fn prepare(
  options: &BuildOptions,
  overrides: EnvOverrides,
  probe: &impl ToolProbe,
  request: &BuildRequest,
) -> Result<(BuildContext, BuildPlan), BuildError> {
  let context = BuildContext::derive(options, overrides, probe)?;
  let plan = BuildPlan::new(&context, request)?;
  Ok((context, plan))
}

/// Download and extract a dependency, returning its source tree.
pub fn fetch_dependency(
  spec: &DependencySpec,
  workspace: &WorkspacePaths,
  source_root: &Path,
  fetcher: &impl SourceFetcher,
) -> Result<PathBuf, BuildError> {
  ensure(&workspace.dependency_dir)?;
  Ok(fetcher.fetch(spec, &workspace.dependency_dir, source_root)?)
}

/// Run a plan to completion.
pub fn run(plan: &BuildPlan, fetcher: &impl SourceFetcher, invoker: &impl Invoker) -> Result<BuildReport, BuildError> {
  info!(dependency = %plan.dependency.name, version = %plan.dependency.version, "starting build");

  for dir in plan.workspace.scratch_dirs() {
    ensure(dir)?;
  }

  let dependency_source = fetch_dependency(&plan.dependency, &plan.workspace, &plan.source_root, fetcher)?;
  if dependency_source != plan.dependency_source {
    warn!(
      fetched = ?dependency_source,
      planned = ?plan.dependency_source,
      "fetched sources differ from the planned tree"
    );
  }

  let mut stages = Vec::with_capacity(plan.stages.len());

  for planned in &plan.stages {
    if planned.stage == Stage::ConfigureTarget {
      ensure(&plan.workspace.output_dir)?;
    }
    stages.push(run_stage(planned, invoker)?);
  }

  info!(output = ?plan.workspace.output_dir, "build complete");

  Ok(BuildReport {
    stages,
    dependency_source,
    output_dir: plan.workspace.output_dir.clone(),
  })
}

fn run_stage(planned: &PlannedStage, invoker: &impl Invoker) -> Result<StageResult, BuildError> {
  let PlannedStage { stage, command } = planned;
  info!(stage = %stage, command = %command, "running stage");

  let start = Instant::now();
  let invocation = invoker.invoke(command).map_err(|e| BuildError::Spawn {
    stage: *stage,
    program: command.program.clone(),
    source: e,
  })?;

  if !invocation.success() {
    error!(stage = %stage, code = ?invocation.code, "stage failed");
    return Err(BuildError::ToolFailed {
      stage: *stage,
      command: command.to_string(),
      code: invocation.code,
      output: invocation.output,
    });
  }

  Ok(StageResult {
    stage: *stage,
    elapsed: start.elapsed(),
  })
}

fn ensure(path: &Path) -> Result<(), BuildError> {
  crate::workspace::ensure_dir(path).map_err(|e| BuildError::Workspace {
    path: path.to_path_buf(),
    source: e,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::{BuildType, CompilerFamily};
  use crate::dependency::{DependencySpec, FetchError};
  use crate::package::ExtensionLayout;
  use crate::platform::os::Os;
  use std::cell::RefCell;
  use std::io;
  use tempfile::TempDir;

  /// Records every command and fails the one at `fail_at`.
  struct RecordingInvoker {
    calls: RefCell<Vec<ToolCommand>>,
    fail_at: Option<usize>,
  }

  impl RecordingInvoker {
    fn new(fail_at: Option<usize>) -> Self {
      Self {
        calls: RefCell::new(Vec::new()),
        fail_at,
      }
    }
  }

  impl Invoker for RecordingInvoker {
    fn invoke(&self, command: &ToolCommand) -> io::Result<Invocation> {
      let mut calls = self.calls.borrow_mut();
      let index = calls.len();
      calls.push(command.clone());
      let code = if self.fail_at == Some(index) { 2 } else { 0 };
      Ok(Invocation { code: Some(code), output: None })
    }
  }

  /// Creates the expected source tree without touching the network.
  struct LocalFetcher;

  impl SourceFetcher for LocalFetcher {
    fn fetch(&self, spec: &DependencySpec, _scratch: &Path, source_root: &Path) -> Result<PathBuf, FetchError> {
      let dir = spec.source_dir(source_root);
      std::fs::create_dir_all(&dir).map_err(|e| FetchError::Io {
        path: dir.clone(),
        source: e,
      })?;
      Ok(dir)
    }
  }

  struct FailingFetcher;

  impl SourceFetcher for FailingFetcher {
    fn fetch(&self, spec: &DependencySpec, _scratch: &Path, _source_root: &Path) -> Result<PathBuf, FetchError> {
      Err(FetchError::Status {
        url: spec.url.clone(),
        status: 503,
      })
    }
  }

  /// Unpacks into a tree of its own choosing.
  struct RelocatingFetcher(PathBuf);

  impl SourceFetcher for RelocatingFetcher {
    fn fetch(&self, _spec: &DependencySpec, _scratch: &Path, _source_root: &Path) -> Result<PathBuf, FetchError> {
      std::fs::create_dir_all(&self.0).map_err(|e| FetchError::Io {
        path: self.0.clone(),
        source: e,
      })?;
      Ok(self.0.clone())
    }
  }

  fn plan_in(temp: &TempDir) -> BuildPlan {
    let context = BuildContext {
      platform: "linux-x86_64".to_string(),
      os: Os::Linux,
      compiler: CompilerFamily::Default,
      build_type: BuildType::Release,
      install_prefix: temp.path().join("prefix"),
      interpreter: PathBuf::from("/usr/bin/python3"),
      ninja: None,
      jobs: None,
      overrides: EnvOverrides::default(),
    };
    let request = BuildRequest::new(
      temp.path(),
      temp.path().join("build").join("temp"),
      ExtensionLayout::new(temp.path().join("build").join("lib"), "stag"),
    );
    BuildPlan::new(&context, &request).unwrap()
  }

  #[test]
  fn runs_all_stages_in_order() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp);
    let invoker = RecordingInvoker::new(None);

    let report = run(&plan, &LocalFetcher, &invoker).unwrap();

    let ran: Vec<Stage> = report.stages.iter().map(|s| s.stage).collect();
    assert_eq!(ran, Stage::ALL.to_vec());
    let calls = invoker.calls.borrow();
    assert_eq!(calls.len(), 5);
    for (call, planned) in calls.iter().zip(&plan.stages) {
      assert_eq!(call, &planned.command);
    }
    assert!(report.output_dir.is_dir());
  }

  #[test]
  fn failed_dependency_build_stops_pipeline() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp);
    let invoker = RecordingInvoker::new(Some(1));

    let err = run(&plan, &LocalFetcher, &invoker).unwrap_err();

    assert!(matches!(
      err,
      BuildError::ToolFailed {
        stage: Stage::BuildDependency,
        code: Some(2),
        ..
      }
    ));
    assert_eq!(invoker.calls.borrow().len(), 2);
    assert!(!plan.workspace.output_dir.exists());
  }

  #[test]
  fn fetch_failure_runs_nothing() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp);
    let invoker = RecordingInvoker::new(None);

    let err = run(&plan, &FailingFetcher, &invoker).unwrap_err();

    assert!(matches!(err, BuildError::Fetch(FetchError::Status { status: 503, .. })));
    assert!(invoker.calls.borrow().is_empty());
    let target_entries = std::fs::read_dir(&plan.workspace.target_dir).unwrap().count();
    assert_eq!(target_entries, 0);
  }

  #[test]
  fn scratch_dirs_survive_failure() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp);
    let invoker = RecordingInvoker::new(Some(0));

    run(&plan, &LocalFetcher, &invoker).unwrap_err();

    assert!(plan.workspace.dependency_dir.is_dir());
    assert!(plan.workspace.target_dir.is_dir());
    assert!(plan.dependency_source.is_dir());
  }

  #[test]
  fn fetched_tree_is_reported_as_returned() {
    let temp = TempDir::new().unwrap();
    let plan = plan_in(&temp);
    let elsewhere = temp.path().join("vendored").join("opencv");

    let source = fetch_dependency(
      &plan.dependency,
      &plan.workspace,
      &plan.source_root,
      &RelocatingFetcher(elsewhere.clone()),
    )
    .unwrap();

    assert_eq!(source, elsewhere);
    assert!(!plan.dependency_source.exists());
  }
}

//! The resolved command list of a build.
//!
//! A [`BuildPlan`] is computed before anything touches the filesystem or the
//! network, so configuration errors (an unmapped platform, say) surface before
//! any external tool runs. It is also what `stagbuild plan` prints.

use std::path::PathBuf;

use serde::Serialize;
use tracing::debug;

use crate::consts::{CMAKE_PROGRAM, DEFAULT_DEPENDENCY_JOBS};
use crate::context::BuildContext;
use crate::dependency::DependencySpec;
use crate::error::ConfigError;
use crate::execute::invoke::ToolCommand;
use crate::execute::types::Stage;
use crate::package::ExtensionLayout;
use crate::platform::ArchMap;
use crate::toolchain::{GeneratorArgs, ToolchainConfigurator};
use crate::workspace::WorkspacePaths;

/// Inputs fixed by whoever defines the build, as opposed to the host.
#[derive(Debug, Clone)]
pub struct BuildRequest {
  /// The extension's own source tree (holds the top-level CMakeLists.txt).
  pub source_root: PathBuf,
  /// Scratch root for the per-unit CMake trees.
  pub build_temp: PathBuf,
  pub layout: ExtensionLayout,
  pub dependency: DependencySpec,
  pub arch_map: ArchMap,
  /// Build-configuration tool to invoke.
  pub cmake: String,
}

impl BuildRequest {
  /// The standard build: OpenCV, the default architecture table and `cmake` from PATH.
  pub fn new(source_root: impl Into<PathBuf>, build_temp: impl Into<PathBuf>, layout: ExtensionLayout) -> Self {
    Self {
      source_root: source_root.into(),
      build_temp: build_temp.into(),
      layout,
      dependency: DependencySpec::opencv(),
      arch_map: ArchMap::default(),
      cmake: CMAKE_PROGRAM.to_string(),
    }
  }

  /// Resolve `source_root` to an absolute path.
  pub fn canonicalize_source_root(mut self) -> Result<Self, ConfigError> {
    self.source_root = dunce::canonicalize(&self.source_root).map_err(|e| ConfigError::SourceRoot {
      path: self.source_root.clone(),
      source: e,
    })?;
    Ok(self)
  }

  /// Scratch and output directories for this request.
  pub fn workspace(&self) -> WorkspacePaths {
    WorkspacePaths::new(
      &self.build_temp,
      &self.dependency.name,
      &self.layout.package,
      self.layout.output_dir(),
    )
  }
}

/// One stage and the command it runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedStage {
  pub stage: Stage,
  pub command: ToolCommand,
}

/// Every command a build will run, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
  pub source_root: PathBuf,
  pub dependency: DependencySpec,
  /// Where the dependency's sources will be after fetching.
  pub dependency_source: PathBuf,
  pub workspace: WorkspacePaths,
  pub stages: Vec<PlannedStage>,
}

impl BuildPlan {
  pub fn new(context: &BuildContext, request: &BuildRequest) -> Result<Self, ConfigError> {
    let configurator = ToolchainConfigurator::new(context, &request.arch_map);
    let common = configurator.common_args()?;
    let workspace = request.workspace();
    let dependency_source = request.dependency.source_dir(&request.source_root);
    let cmake = &request.cmake;

    let mut dependency_args = GeneratorArgs::new();
    dependency_args.push(dependency_source.display().to_string());
    dependency_args.push(format!("-DCMAKE_INSTALL_PREFIX={}", context.install_prefix.display()));
    dependency_args.extend(request.dependency.exclusion_args());
    dependency_args.extend(common.iter().cloned());

    let mut target_args = GeneratorArgs::new();
    target_args.push(request.source_root.display().to_string());
    target_args.extend(common.iter().cloned());
    target_args.extend(request.layout.output_overrides(context.build_type));

    let stages = vec![
      PlannedStage {
        stage: Stage::ConfigureDependency,
        command: ToolCommand::new(cmake, dependency_args.into_vec(), &workspace.dependency_dir),
      },
      PlannedStage {
        stage: Stage::BuildDependency,
        command: ToolCommand::new(
          cmake,
          driver_args("--build", configurator.build_args(Some(DEFAULT_DEPENDENCY_JOBS))),
          &workspace.dependency_dir,
        ),
      },
      PlannedStage {
        stage: Stage::InstallDependency,
        command: ToolCommand::new(
          cmake,
          driver_args("--install", configurator.install_args()),
          &workspace.dependency_dir,
        ),
      },
      PlannedStage {
        stage: Stage::ConfigureTarget,
        command: ToolCommand::new(cmake, target_args.into_vec(), &workspace.target_dir),
      },
      PlannedStage {
        stage: Stage::BuildTarget,
        command: ToolCommand::new(
          cmake,
          driver_args("--build", configurator.build_args(None)),
          &workspace.target_dir,
        ),
      },
    ];

    debug!(stages = stages.len(), "computed build plan");

    Ok(Self {
      source_root: request.source_root.clone(),
      dependency: request.dependency.clone(),
      dependency_source,
      workspace,
      stages,
    })
  }

  /// The planned command for `stage`.
  pub fn command(&self, stage: Stage) -> Option<&ToolCommand> {
    self.stages.iter().find(|s| s.stage == stage).map(|s| &s.command)
  }
}

/// `<mode> . <args>`, run from inside the scratch tree.
fn driver_args(mode: &str, args: Vec<String>) -> Vec<String> {
  let mut all = vec![mode.to_string(), ".".to_string()];
  all.extend(args);
  all
}

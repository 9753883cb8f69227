//! Types for pipeline execution.
//!
//! This module defines the stages of a build, the error type that aborts a
//! pipeline, and the report of a finished one.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::dependency::FetchError;
use crate::error::ConfigError;

/// The five external invocations of a build, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
  ConfigureDependency,
  BuildDependency,
  InstallDependency,
  ConfigureTarget,
  BuildTarget,
}

impl Stage {
  pub const ALL: [Stage; 5] = [
    Stage::ConfigureDependency,
    Stage::BuildDependency,
    Stage::InstallDependency,
    Stage::ConfigureTarget,
    Stage::BuildTarget,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      Stage::ConfigureDependency => "configure-dependency",
      Stage::BuildDependency => "build-dependency",
      Stage::InstallDependency => "install-dependency",
      Stage::ConfigureTarget => "configure-target",
      Stage::BuildTarget => "build-target",
    }
  }

  /// Whether this stage works on the dependency rather than the extension.
  pub fn is_dependency(&self) -> bool {
    matches!(
      self,
      Stage::ConfigureDependency | Stage::BuildDependency | Stage::InstallDependency
    )
  }
}

impl fmt::Display for Stage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Errors that abort a build. None of them are retried.
#[derive(Debug, Error)]
pub enum BuildError {
  /// The build could not be configured; nothing was run.
  #[error("configuration error: {0}")]
  Configuration(#[from] ConfigError),

  /// The dependency sources could not be acquired.
  #[error("fetch error: {0}")]
  Fetch(#[from] FetchError),

  /// An external tool exited unsuccessfully.
  #[error("{stage} failed with exit code {code:?}: {command}")]
  ToolFailed {
    stage: Stage,
    command: String,
    code: Option<i32>,
    /// Captured tool output, when capturing was enabled.
    output: Option<String>,
  },

  /// An external tool could not be started.
  #[error("{stage} could not start '{program}': {source}")]
  Spawn {
    stage: Stage,
    program: String,
    #[source]
    source: std::io::Error,
  },

  /// A workspace directory could not be created.
  #[error("failed to create directory '{path}': {source}")]
  Workspace {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

impl BuildError {
  /// The stage that failed, if the failure came from an external tool.
  pub fn stage(&self) -> Option<Stage> {
    match self {
      BuildError::ToolFailed { stage, .. } | BuildError::Spawn { stage, .. } => Some(*stage),
      _ => None,
    }
  }

  /// Process exit code to report for this failure.
  ///
  /// A failing tool's own non-zero code is passed through; everything else is 1.
  pub fn exit_code(&self) -> i32 {
    match self {
      BuildError::ToolFailed { code: Some(code), .. } if *code != 0 => *code,
      _ => 1,
    }
  }
}

/// A stage that completed successfully.
#[derive(Debug, Clone)]
pub struct StageResult {
  pub stage: Stage,
  pub elapsed: Duration,
}

/// Result of a completed build.
#[derive(Debug, Clone)]
pub struct BuildReport {
  /// Completed stages in execution order; always all five.
  pub stages: Vec<StageResult>,
  /// Extracted dependency source tree.
  pub dependency_source: PathBuf,
  /// Directory holding the compiled extension module.
  pub output_dir: PathBuf,
}

impl BuildReport {
  pub fn total_elapsed(&self) -> Duration {
    self.stages.iter().map(|s| s.elapsed).sum()
  }
}

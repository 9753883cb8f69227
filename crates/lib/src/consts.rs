//! Names and pinned values shared across the orchestrator.

pub const APP_NAME: &str = "stagbuild";

/// Package directory the compiled extension module is placed in.
pub const PACKAGE_NAME: &str = "stag";

/// Top-level directory holding scratch trees and built extensions.
pub const BUILD_DIR: &str = "build";

/// Directory under the source root that fetched dependency sources are extracted into.
pub const SUBMODULES_DIR: &str = "submodules";

/// Build-configuration tool invoked for every stage.
pub const CMAKE_PROGRAM: &str = "cmake";

/// Fast job-parallel generator preferred outside MSVC.
pub const NINJA_GENERATOR: &str = "Ninja";
pub const NINJA_PROGRAM: &str = "ninja";

/// Interpreters probed for, in order, when none is given.
pub const INTERPRETER_CANDIDATES: &[&str] = &["python3", "python"];

/// Job count for the dependency build when the caller asked for none.
pub const DEFAULT_DEPENDENCY_JOBS: u32 = 10;

/// Environment variables read while deriving a build context.
pub mod env {
  pub const DEBUG: &str = "DEBUG";
  pub const CMAKE_GENERATOR: &str = "CMAKE_GENERATOR";
  pub const CMAKE_ARGS: &str = "CMAKE_ARGS";
  pub const ARCHFLAGS: &str = "ARCHFLAGS";
  pub const CMAKE_BUILD_PARALLEL_LEVEL: &str = "CMAKE_BUILD_PARALLEL_LEVEL";
  pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
  pub const CONDA_PREFIX: &str = "CONDA_PREFIX";
}

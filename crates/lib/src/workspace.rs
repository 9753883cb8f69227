//! Per-build scratch directories.
//!
//! A workspace belongs to exactly one running build. Two builds sharing a
//! scratch root at the same time step on each other's CMake caches; the caller
//! must serialise them. Nothing here is ever deleted: on failure the trees stay
//! in place for inspection and CI reclaims them.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

/// Scratch and output directories for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkspacePaths {
  /// CMake tree for the dependency.
  pub dependency_dir: PathBuf,
  /// CMake tree for the extension module.
  pub target_dir: PathBuf,
  /// Where the compiled extension ends up.
  pub output_dir: PathBuf,
}

impl WorkspacePaths {
  /// Lay out a workspace below `build_temp`, named after the two build units.
  pub fn new(build_temp: &Path, dependency_name: &str, target_name: &str, output_dir: PathBuf) -> Self {
    Self {
      dependency_dir: build_temp.join(dependency_name),
      target_dir: build_temp.join(target_name),
      output_dir,
    }
  }

  /// Both scratch directories, dependency first.
  pub fn scratch_dirs(&self) -> [&Path; 2] {
    [self.dependency_dir.as_path(), self.target_dir.as_path()]
  }
}

/// Create `path` and its parents; an existing directory is not an error.
pub fn ensure_dir(path: &Path) -> io::Result<()> {
  fs::create_dir_all(path)?;
  debug!(path = ?path, "directory ready");
  Ok(())
}

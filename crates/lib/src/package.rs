//! Extension output placement.
//!
//! The packaging step expects the compiled module under
//! `<extension dir>/<package>/`. CMake is told to write it there directly so no
//! copy step is needed after the build.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::context::BuildType;

/// Where the compiled extension module lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionLayout {
  /// Directory the packaging step collects extension modules from.
  pub extension_dir: PathBuf,
  /// Package subdirectory the module is placed in.
  pub package: String,
}

impl ExtensionLayout {
  pub fn new(extension_dir: impl Into<PathBuf>, package: impl Into<String>) -> Self {
    Self {
      extension_dir: extension_dir.into(),
      package: package.into(),
    }
  }

  /// Final directory of the compiled module.
  pub fn output_dir(&self) -> PathBuf {
    self.extension_dir.join(&self.package)
  }

  /// Library output overrides for the target configure.
  ///
  /// The plain variable covers single-config generators; multi-config
  /// generators read the `_<CONFIG>` suffixed one instead.
  pub fn output_overrides(&self, build_type: BuildType) -> Vec<String> {
    let dir = self.output_dir();
    vec![
      library_output_arg(None, &dir),
      library_output_arg(Some(build_type), &dir),
    ]
  }
}

fn library_output_arg(build_type: Option<BuildType>, dir: &Path) -> String {
  match build_type {
    Some(build_type) => format!(
      "-DCMAKE_LIBRARY_OUTPUT_DIRECTORY_{}={}",
      build_type.as_str().to_uppercase(),
      dir.display()
    ),
    None => format!("-DCMAKE_LIBRARY_OUTPUT_DIRECTORY={}", dir.display()),
  }
}

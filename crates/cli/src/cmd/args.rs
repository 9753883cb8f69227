//! Options shared by every command that describes a build.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use stagbuild_lib::consts::{CMAKE_PROGRAM, PACKAGE_NAME};
use stagbuild_lib::context::{BuildOptions, CompilerFamily};
use stagbuild_lib::execute::BuildRequest;
use stagbuild_lib::package::ExtensionLayout;
use stagbuild_lib::platform::paths::{default_build_temp, default_extension_dir};
use stagbuild_lib::platform::platform_tag;

#[derive(Debug, Clone, Args)]
pub struct BuildArgs {
  /// Extension source tree (holds the top-level CMakeLists.txt)
  #[arg(long, default_value = ".")]
  pub source_dir: PathBuf,

  /// Scratch directory for the dependency and extension build trees; only one
  /// build may use it at a time [default: <source-dir>/build/temp.<platform>]
  #[arg(long)]
  pub build_temp: Option<PathBuf>,

  /// Directory the built package is placed in [default: <source-dir>/build/lib.<platform>]
  #[arg(long)]
  pub ext_dir: Option<PathBuf>,

  /// Package subdirectory the compiled module lands in
  #[arg(long, default_value = PACKAGE_NAME)]
  pub package: String,

  /// Install prefix for the dependency [default: the active Python environment]
  #[arg(long)]
  pub prefix: Option<PathBuf>,

  /// Python interpreter the extension is built for [default: python3 on PATH]
  #[arg(long)]
  pub python: Option<PathBuf>,

  /// Platform tag, e.g. win-amd64 [default: host platform]
  #[arg(long)]
  pub plat_name: Option<String>,

  /// Compiler family: default or msvc [default: msvc on Windows, default elsewhere]
  #[arg(long)]
  pub compiler: Option<CompilerFamily>,

  /// Build in Debug mode (overrides DEBUG)
  #[arg(short, long)]
  pub debug: bool,

  /// Build in Release mode (overrides DEBUG)
  #[arg(long, conflicts_with = "debug")]
  pub release: bool,

  /// Parallel jobs for the build driver (ignored when CMAKE_BUILD_PARALLEL_LEVEL is set)
  #[arg(short, long)]
  pub jobs: Option<u32>,

  /// CMake executable
  #[arg(long, default_value = CMAKE_PROGRAM)]
  pub cmake: String,
}

impl BuildArgs {
  /// Caller intent for context derivation.
  pub fn options(&self) -> BuildOptions {
    let debug = match (self.debug, self.release) {
      (true, _) => Some(true),
      (_, true) => Some(false),
      _ => None,
    };

    BuildOptions {
      platform: self.plat_name.clone(),
      compiler: self.compiler,
      debug,
      jobs: self.jobs,
      install_prefix: self.prefix.clone(),
      interpreter: self.python.clone(),
      os: None,
    }
  }

  /// Directories and dependency for the build, with defaults filled in.
  pub fn request(&self) -> Result<BuildRequest> {
    let tag = self
      .plat_name
      .clone()
      .or_else(platform_tag)
      .context("Could not detect platform, pass --plat-name")?;

    let unresolved = BuildRequest::new(
      &self.source_dir,
      PathBuf::new(),
      ExtensionLayout::new(PathBuf::new(), &self.package),
    );
    let request = unresolved.canonicalize_source_root()?;

    let build_temp = self
      .build_temp
      .clone()
      .unwrap_or_else(|| default_build_temp(&request.source_root, &tag));
    let ext_dir = self
      .ext_dir
      .clone()
      .unwrap_or_else(|| default_extension_dir(&request.source_root, &tag));

    Ok(BuildRequest {
      build_temp,
      layout: ExtensionLayout::new(ext_dir, &self.package),
      cmake: self.cmake.clone(),
      ..request
    })
  }
}

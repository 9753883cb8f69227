use std::path::{Path, PathBuf};

use crate::consts::BUILD_DIR;
use crate::error::ConfigError;

/// Returns the scratch root for intermediate build trees, e.g. `build/temp.linux-x86_64`
pub fn default_build_temp(source_root: &Path, platform_tag: &str) -> PathBuf {
  source_root.join(BUILD_DIR).join(format!("temp.{}", platform_tag))
}

/// Returns the directory compiled extension modules are placed under, e.g. `build/lib.linux-x86_64`
pub fn default_extension_dir(source_root: &Path, platform_tag: &str) -> PathBuf {
  source_root.join(BUILD_DIR).join(format!("lib.{}", platform_tag))
}

/// Guesses the installation root from where an interpreter binary lives.
///
/// Unix layouts and Unix venvs keep the binary in `<prefix>/bin`, Windows venvs
/// in `<prefix>\Scripts`, and Windows installs directly in the prefix. Shims
/// (pyenv, asdf) defeat this; ask the interpreter when possible.
pub fn interpreter_prefix(interpreter: &Path) -> Option<PathBuf> {
  let dir = interpreter.parent().filter(|dir| !dir.as_os_str().is_empty())?;
  let is_script_dir = dir
    .file_name()
    .and_then(|name| name.to_str())
    .is_some_and(|name| name == "bin" || name.eq_ignore_ascii_case("scripts"));
  if is_script_dir {
    return dir.parent().map(Path::to_path_buf);
  }
  Some(dir.to_path_buf())
}

/// Resolve where the dependency gets installed.
///
/// Precedence: an explicit prefix, then the active virtual/conda environment,
/// then the prefix the interpreter reported, then a guess from the
/// interpreter's location.
pub fn resolve_install_prefix(
  explicit: Option<&Path>,
  active_env: Option<&Path>,
  reported: Option<&Path>,
  interpreter: &Path,
) -> Result<PathBuf, ConfigError> {
  if let Some(prefix) = explicit.or(active_env).or(reported) {
    return Ok(prefix.to_path_buf());
  }
  interpreter_prefix(interpreter).ok_or_else(|| ConfigError::NoInstallPrefix(interpreter.to_path_buf()))
}

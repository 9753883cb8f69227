//! Environment overrides recognised by the orchestrator.
//!
//! These are the variables packaging front-ends and CI systems (conda-build,
//! cibuildwheel) already use to steer CMake builds, so they are read verbatim.

use std::path::PathBuf;

use serde::Serialize;

use crate::consts::env;
use crate::error::ConfigError;

/// Everything the orchestrator takes from the process environment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvOverrides {
  /// `DEBUG`: non-zero forces a Debug build unless the caller fixed the build type.
  pub debug: Option<bool>,
  /// `CMAKE_GENERATOR`: explicit generator choice.
  pub generator: Option<String>,
  /// `CMAKE_ARGS`: extra configure arguments.
  pub extra_args: Vec<String>,
  /// `ARCHFLAGS`: raw compiler flags; only macOS builds read `-arch` names from them.
  pub arch_flags: Option<String>,
  /// `CMAKE_BUILD_PARALLEL_LEVEL`: when present the build driver picks its own job count.
  pub parallel_level: Option<String>,
  /// `VIRTUAL_ENV` or `CONDA_PREFIX`: the active environment's installation root.
  pub active_prefix: Option<PathBuf>,
}

impl EnvOverrides {
  /// Read overrides from the current process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Read overrides through `lookup`, which returns a variable's value if set.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
    let debug = lookup(env::DEBUG).map(|value| parse_debug(&value)).transpose()?;

    let generator = lookup(env::CMAKE_GENERATOR).filter(|g| !g.trim().is_empty());

    let extra_args = lookup(env::CMAKE_ARGS)
      .map(|args| split_args(&args))
      .unwrap_or_default();

    let active_prefix = lookup(env::VIRTUAL_ENV)
      .filter(|p| !p.is_empty())
      .or_else(|| lookup(env::CONDA_PREFIX).filter(|p| !p.is_empty()))
      .map(PathBuf::from);

    Ok(Self {
      debug,
      generator,
      extra_args,
      arch_flags: lookup(env::ARCHFLAGS),
      parallel_level: lookup(env::CMAKE_BUILD_PARALLEL_LEVEL),
      active_prefix,
    })
  }
}

fn parse_debug(value: &str) -> Result<bool, ConfigError> {
  value
    .trim()
    .parse::<i64>()
    .map(|level| level != 0)
    .map_err(|e| ConfigError::InvalidEnv {
      var: env::DEBUG,
      value: value.to_string(),
      reason: e.to_string(),
    })
}

/// Split a free-form argument string on whitespace, dropping empty tokens.
pub fn split_args(args: &str) -> Vec<String> {
  args.split_whitespace().map(str::to_string).collect()
}

/// Collect the names following each `-arch` token.
pub fn parse_arch_flags(flags: &str) -> Result<Vec<String>, ConfigError> {
  let mut archs = Vec::new();
  let mut tokens = flags.split_whitespace();

  while let Some(token) = tokens.next() {
    if token != "-arch" {
      continue;
    }
    match tokens.next() {
      Some(arch) => archs.push(arch.to_string()),
      None => {
        return Err(ConfigError::InvalidEnv {
          var: env::ARCHFLAGS,
          value: flags.to_string(),
          reason: "'-arch' without an architecture name".to_string(),
        });
      }
    }
  }

  Ok(archs)
}

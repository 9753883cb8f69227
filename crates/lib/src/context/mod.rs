//! Build context derivation.
//!
//! A [`BuildContext`] is derived once per invocation from caller options, the
//! environment and the host, then shared read-only by every later stage.

pub mod env;
pub mod probe;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, info};

use crate::consts::{INTERPRETER_CANDIDATES, NINJA_PROGRAM};
use crate::error::ConfigError;
use crate::platform::Platform;
use crate::platform::os::Os;
use crate::platform::paths::resolve_install_prefix;

pub use env::EnvOverrides;
pub use probe::{PathProbe, ToolProbe};

/// Compiler family driving generator selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompilerFamily {
  /// Whatever the build system picks; the fast parallel generator is preferred.
  Default,
  /// The IDE-integrated Microsoft toolchain.
  Msvc,
}

impl CompilerFamily {
  /// The family a plain build on this host would use.
  pub fn host() -> Self {
    if cfg!(all(windows, target_env = "msvc")) {
      Self::Msvc
    } else {
      Self::Default
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Default => "default",
      Self::Msvc => "msvc",
    }
  }
}

impl fmt::Display for CompilerFamily {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for CompilerFamily {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "default" | "unix" | "gcc" | "clang" => Ok(Self::Default),
      "msvc" => Ok(Self::Msvc),
      other => Err(format!("unknown compiler family '{}'", other)),
    }
  }
}

/// Debug or release build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BuildType {
  Debug,
  Release,
}

impl BuildType {
  pub fn from_debug(debug: bool) -> Self {
    if debug { Self::Debug } else { Self::Release }
  }

  /// CMake configuration name (`Debug` / `Release`)
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Debug => "Debug",
      Self::Release => "Release",
    }
  }
}

impl fmt::Display for BuildType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// What the caller asked for. Anything left `None` is derived.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
  /// Platform tag, e.g. `win-amd64`. Defaults to the host's tag.
  pub platform: Option<String>,
  pub compiler: Option<CompilerFamily>,
  /// Fixes the build type; when unset `DEBUG` decides.
  pub debug: Option<bool>,
  /// Explicit job count for the build driver.
  pub jobs: Option<u32>,
  pub install_prefix: Option<PathBuf>,
  pub interpreter: Option<PathBuf>,
  /// Host OS override, mostly for planning another host's build.
  pub os: Option<Os>,
}

/// Everything later stages need to know about this build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildContext {
  pub platform: String,
  pub os: Os,
  pub compiler: CompilerFamily,
  pub build_type: BuildType,
  pub install_prefix: PathBuf,
  pub interpreter: PathBuf,
  /// Fast generator driver, if one is installed.
  pub ninja: Option<PathBuf>,
  pub jobs: Option<u32>,
  pub overrides: EnvOverrides,
}

impl BuildContext {
  /// Derive the context for one build invocation.
  pub fn derive(options: &BuildOptions, overrides: EnvOverrides, probe: &impl ToolProbe) -> Result<Self, ConfigError> {
    let host = Platform::current();

    let os = match options.os.or(host.map(|p| p.os)) {
      Some(os) => os,
      None => return Err(unsupported_host()),
    };

    let platform = match (&options.platform, host) {
      (Some(tag), _) => tag.clone(),
      (None, Some(host)) => host.tag(),
      (None, None) => return Err(unsupported_host()),
    };

    let compiler = options.compiler.unwrap_or_else(CompilerFamily::host);

    let debug = options.debug.or(overrides.debug).unwrap_or(false);
    let build_type = BuildType::from_debug(debug);

    let interpreter = match &options.interpreter {
      Some(path) => path.clone(),
      None => INTERPRETER_CANDIDATES
        .iter()
        .find_map(|candidate| probe.find(candidate))
        .ok_or_else(|| ConfigError::InterpreterNotFound(INTERPRETER_CANDIDATES.join(", ")))?,
    };

    let explicit = options.install_prefix.as_deref().or(overrides.active_prefix.as_deref());
    let reported = match explicit {
      Some(_) => None,
      None => probe.interpreter_prefix(&interpreter),
    };
    let install_prefix = resolve_install_prefix(
      options.install_prefix.as_deref(),
      overrides.active_prefix.as_deref(),
      reported.as_deref(),
      &interpreter,
    )?;

    let ninja = probe.find(NINJA_PROGRAM);
    if ninja.is_none() {
      debug!("ninja not available, the default generator will be used");
    }

    let context = Self {
      platform,
      os,
      compiler,
      build_type,
      install_prefix,
      interpreter,
      ninja,
      jobs: options.jobs,
      overrides,
    };

    info!(
      platform = %context.platform,
      compiler = %context.compiler,
      build_type = %context.build_type,
      prefix = ?context.install_prefix,
      "derived build context"
    );

    Ok(context)
  }

  pub fn is_debug(&self) -> bool {
    self.build_type == BuildType::Debug
  }
}

fn unsupported_host() -> ConfigError {
  ConfigError::UnsupportedHost {
    os: std::env::consts::OS.to_string(),
    arch: std::env::consts::ARCH.to_string(),
  }
}

//! Configuration errors raised while deriving a build context.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a build before any external tool runs.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// The platform tag has no architecture mapping but the generator needs one.
  #[error("unknown platform '{tag}': generator '{generator}' needs an explicit architecture")]
  UnknownPlatform { tag: String, generator: String },

  /// An environment override could not be parsed.
  #[error("invalid value for {var} ({value:?}): {reason}")]
  InvalidEnv {
    var: &'static str,
    value: String,
    reason: String,
  },

  /// The host OS or architecture is not one the orchestrator knows.
  #[error("unsupported host platform: {os}/{arch}")]
  UnsupportedHost { os: String, arch: String },

  /// No interpreter was given and none was found on PATH.
  #[error("no Python interpreter found on PATH (tried {0})")]
  InterpreterNotFound(String),

  /// The install prefix could not be derived from the interpreter path.
  #[error("cannot derive an install prefix from interpreter '{0}'")]
  NoInstallPrefix(PathBuf),

  /// The orchestrator's own source tree could not be resolved.
  #[error("failed to resolve source root '{path}': {source}")]
  SourceRoot {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

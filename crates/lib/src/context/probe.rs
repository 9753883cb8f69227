//! Locating external programs and asking the interpreter about itself.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

/// Script printing the interpreter's installation prefix.
const PREFIX_QUERY: &str = "import sys; print(sys.prefix)";

/// Finds programs the build relies on.
pub trait ToolProbe {
  /// Absolute path of `program` if it can be run.
  fn find(&self, program: &str) -> Option<PathBuf>;

  /// The prefix `interpreter` reports for itself, if it can be asked.
  fn interpreter_prefix(&self, _interpreter: &Path) -> Option<PathBuf> {
    None
  }
}

/// Searches `PATH` the way a shell would.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathProbe;

impl ToolProbe for PathProbe {
  fn find(&self, program: &str) -> Option<PathBuf> {
    match which::which(program) {
      Ok(path) => {
        debug!(program = %program, path = ?path, "found program");
        Some(path)
      }
      Err(e) => {
        debug!(program = %program, error = %e, "program not found");
        None
      }
    }
  }

  fn interpreter_prefix(&self, interpreter: &Path) -> Option<PathBuf> {
    let output = match Command::new(interpreter)
      .args(["-c", PREFIX_QUERY])
      .stdin(Stdio::null())
      .stderr(Stdio::null())
      .output()
    {
      Ok(output) => output,
      Err(e) => {
        debug!(interpreter = ?interpreter, error = %e, "could not run interpreter");
        return None;
      }
    };

    if !output.status.success() {
      debug!(interpreter = ?interpreter, code = ?output.status.code(), "prefix query failed");
      return None;
    }

    let prefix = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if prefix.is_empty() {
      return None;
    }
    debug!(interpreter = ?interpreter, prefix = %prefix, "interpreter reported prefix");
    Some(PathBuf::from(prefix))
  }
}

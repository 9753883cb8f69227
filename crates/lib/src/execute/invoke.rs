//! External tool invocation.
//!
//! Stages never spawn processes directly; they go through an [`Invoker`], so
//! the pipeline can be driven by a recording fake in tests.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use serde::Serialize;
use tracing::debug;

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolCommand {
  pub program: String,
  pub args: Vec<String>,
  /// Working directory the command runs in.
  pub cwd: PathBuf,
}

impl ToolCommand {
  pub fn new(program: impl Into<String>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      args,
      cwd: cwd.into(),
    }
  }
}

impl fmt::Display for ToolCommand {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.program)?;
    for arg in &self.args {
      if arg.is_empty() || arg.contains(char::is_whitespace) {
        write!(f, " \"{}\"", arg)?;
      } else {
        write!(f, " {}", arg)?;
      }
    }
    Ok(())
  }
}

/// How a finished invocation went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
  /// Exit code; `None` when the process was killed by a signal.
  pub code: Option<i32>,
  /// Combined stdout and stderr, when captured.
  pub output: Option<String>,
}

impl Invocation {
  pub fn success(&self) -> bool {
    self.code == Some(0)
  }
}

/// Runs external commands to completion.
pub trait Invoker {
  /// Run `command` and wait for it. `Err` means it could not be started.
  fn invoke(&self, command: &ToolCommand) -> io::Result<Invocation>;
}

/// What happens to a tool's output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
  /// Stream straight to the terminal.
  #[default]
  Inherit,
  /// Collect it and hand it back with the result.
  Capture,
}

/// Spawns real processes, inheriting the orchestrator's environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessInvoker {
  pub output: OutputMode,
}

impl ProcessInvoker {
  pub fn new(output: OutputMode) -> Self {
    Self { output }
  }
}

impl Invoker for ProcessInvoker {
  fn invoke(&self, command: &ToolCommand) -> io::Result<Invocation> {
    debug!(command = %command, cwd = ?command.cwd, "spawning process");

    let mut process = Command::new(&command.program);
    process.args(&command.args).current_dir(&command.cwd).stdin(Stdio::null());

    match self.output {
      OutputMode::Inherit => {
        let status = process.status()?;
        Ok(Invocation {
          code: status.code(),
          output: None,
        })
      }
      OutputMode::Capture => {
        let output = process.output()?;
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !stdout.is_empty() {
          debug!(stdout = %stdout, "command stdout");
        }
        if !stderr.is_empty() {
          debug!(stderr = %stderr, "command stderr");
        }

        let mut combined = stdout.into_owned();
        if !stderr.is_empty() {
          if !combined.is_empty() && !combined.ends_with('\n') {
            combined.push('\n');
          }
          combined.push_str(&stderr);
        }

        Ok(Invocation {
          code: output.status.code(),
          output: Some(combined),
        })
      }
    }
  }
}

//! Shared fakes for orchestration tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use stagbuild_lib::context::ToolProbe;
use stagbuild_lib::dependency::{DependencySpec, FetchError, SourceFetcher};
use stagbuild_lib::execute::{BuildRequest, Invocation, Invoker, ToolCommand};
use stagbuild_lib::package::ExtensionLayout;
use tempfile::TempDir;

/// Probe answering from a fixed table.
pub struct FixedProbe(HashMap<String, PathBuf>);

impl FixedProbe {
  pub fn with(tools: &[(&str, &str)]) -> Self {
    Self(
      tools
        .iter()
        .map(|(name, path)| (name.to_string(), PathBuf::from(path)))
        .collect(),
    )
  }
}

impl ToolProbe for FixedProbe {
  fn find(&self, program: &str) -> Option<PathBuf> {
    self.0.get(program).cloned()
  }
}

/// Records every invocation; fails the one whose index is `fail_at`.
pub struct RecordingInvoker {
  pub calls: RefCell<Vec<ToolCommand>>,
  fail_at: Option<usize>,
}

impl RecordingInvoker {
  pub fn succeeding() -> Self {
    Self {
      calls: RefCell::new(Vec::new()),
      fail_at: None,
    }
  }

  pub fn failing_at(index: usize) -> Self {
    Self {
      calls: RefCell::new(Vec::new()),
      fail_at: Some(index),
    }
  }

  pub fn call_count(&self) -> usize {
    self.calls.borrow().len()
  }
}

impl Invoker for RecordingInvoker {
  fn invoke(&self, command: &ToolCommand) -> io::Result<Invocation> {
    let mut calls = self.calls.borrow_mut();
    let code = if self.fail_at == Some(calls.len()) { 1 } else { 0 };
    calls.push(command.clone());
    Ok(Invocation { code: Some(code), output: None })
  }
}

/// Materialises the expected source tree locally.
pub struct LocalFetcher;

impl SourceFetcher for LocalFetcher {
  fn fetch(&self, spec: &DependencySpec, _scratch_dir: &Path, source_root: &Path) -> Result<PathBuf, FetchError> {
    let dir = spec.source_dir(source_root);
    std::fs::create_dir_all(&dir).map_err(|e| FetchError::Io {
      path: dir.clone(),
      source: e,
    })?;
    Ok(dir)
  }
}

/// A standard request rooted in a fresh temp directory.
pub fn temp_request() -> (TempDir, BuildRequest) {
  let temp = TempDir::new().unwrap();
  let request = BuildRequest::new(
    temp.path(),
    temp.path().join("build").join("temp"),
    ExtensionLayout::new(temp.path().join("build").join("lib"), "stag"),
  );
  (temp, request)
}

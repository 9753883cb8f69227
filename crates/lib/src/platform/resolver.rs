//! Platform tag to generator architecture mapping.
//!
//! Multi-configuration Visual Studio generators need the target architecture
//! spelled out with `-A`; every other generator infers it. The mapping is plain
//! data so callers (and tests) can substitute their own table.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::ConfigError;
use crate::toolchain::Generator;

/// Flag that pins the target architecture on Visual Studio generators.
pub const ARCH_SELECTOR_FLAG: &str = "-A";

/// Lookup table from platform tag to the generator's architecture name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchMap {
  entries: BTreeMap<String, String>,
}

impl ArchMap {
  /// An empty table; every lookup fails.
  pub fn empty() -> Self {
    Self {
      entries: BTreeMap::new(),
    }
  }

  /// Add or replace one mapping.
  pub fn with(mut self, tag: impl Into<String>, arch: impl Into<String>) -> Self {
    self.entries.insert(tag.into(), arch.into());
    self
  }

  /// The generator architecture for `tag`, if known.
  pub fn get(&self, tag: &str) -> Option<&str> {
    self.entries.get(tag).map(String::as_str)
  }

  /// Resolve the architecture-selector arguments for `generator` on `tag`.
  ///
  /// Returns `Ok(None)` when the generator picks the architecture itself.
  /// An unknown tag is only an error when the generator needs an explicit
  /// architecture.
  pub fn resolve(&self, tag: &str, generator: &Generator) -> Result<Option<[String; 2]>, ConfigError> {
    if !generator.needs_arch_selector() {
      return Ok(None);
    }

    let arch = self.get(tag).ok_or_else(|| ConfigError::UnknownPlatform {
      tag: tag.to_string(),
      generator: generator.display_name().to_string(),
    })?;

    debug!(tag = %tag, arch = %arch, "resolved architecture selector");
    Ok(Some([ARCH_SELECTOR_FLAG.to_string(), arch.to_string()]))
  }
}

impl Default for ArchMap {
  /// Windows platform tags understood by the Visual Studio generators.
  fn default() -> Self {
    Self::empty()
      .with("win32", "Win32")
      .with("win-amd64", "x64")
      .with("win-arm32", "ARM")
      .with("win-arm64", "ARM64")
  }
}

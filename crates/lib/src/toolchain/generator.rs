//! Build generator classification.

use serde::Serialize;

use crate::consts::NINJA_GENERATOR;
use crate::context::CompilerFamily;

/// Name fragments marking a generator that fixes the build type at configure time.
const SINGLE_CONFIG_MARKERS: &[&str] = &["NMake", "Ninja"];

/// Name fragments of the legacy generator names that carry the architecture.
const EMBEDDED_ARCH_MARKERS: &[&str] = &["ARM", "Win64"];

/// The generator a configure step targets, as far as the orchestrator can tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Generator {
  /// Explicitly requested name; `None` leaves the choice to CMake.
  pub name: Option<String>,
  pub family: CompilerFamily,
}

impl Generator {
  pub fn new(name: Option<&str>, family: CompilerFamily) -> Self {
    Self {
      name: name.map(str::to_string),
      family,
    }
  }

  fn name_contains_any(&self, markers: &[&str]) -> bool {
    self
      .name
      .as_deref()
      .is_some_and(|name| markers.iter().any(|marker| name.contains(marker)))
  }

  /// Name for messages; `(default)` when none was requested.
  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or("(default)")
  }

  /// Whether the generator fixes the build type at configure time.
  pub fn is_single_config(&self) -> bool {
    self.name_contains_any(SINGLE_CONFIG_MARKERS)
  }

  /// Whether the generator name already pins the architecture (`... Win64`, `... ARM`).
  pub fn embeds_arch(&self) -> bool {
    self.name_contains_any(EMBEDDED_ARCH_MARKERS)
  }

  /// Whether build and install steps must pass `--config`.
  pub fn is_multi_config(&self) -> bool {
    self.family == CompilerFamily::Msvc && !self.is_single_config()
  }

  /// Whether configure needs an explicit `-A <arch>`.
  pub fn needs_arch_selector(&self) -> bool {
    self.is_multi_config() && !self.embeds_arch()
  }

  /// Whether the orchestrator should try to select Ninja itself.
  pub fn prefers_ninja(&self) -> bool {
    self.family != CompilerFamily::Msvc && self.name.as_deref().is_none_or(|name| name == NINJA_GENERATOR)
  }
}

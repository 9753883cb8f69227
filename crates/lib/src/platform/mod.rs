//! Host platform detection and platform-tag handling.
//!
//! Platform tags follow the naming used by Python wheel tooling (`win32`,
//! `win-amd64`, `linux-x86_64`, `macosx-arm64`), since those are the identifiers
//! packaging front-ends hand to the orchestrator.

pub mod arch;
pub mod os;
pub mod paths;
pub mod resolver;

use arch::Arch;
use os::Os;
use std::fmt;

pub use resolver::ArchMap;

/// Platform identifier combining architecture and OS
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub arch: Arch,
  pub os: Os,
}

impl Platform {
  /// Create a new platform identifier
  pub fn new(arch: Arch, os: Os) -> Self {
    Self { arch, os }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      arch: Arch::current()?,
      os: Os::current()?,
    })
  }

  /// Returns the wheel-style platform tag (e.g., "win-amd64", "linux-x86_64")
  pub fn tag(&self) -> String {
    match self.os {
      Os::Windows => match self.arch.windows_suffix() {
        Some(suffix) => format!("win-{}", suffix),
        None => "win32".to_string(),
      },
      Os::MacOs => {
        let arch = match self.arch {
          Arch::Aarch64 => "arm64",
          other => other.as_str(),
        };
        format!("macosx-{}", arch)
      }
      Os::Linux => format!("linux-{}", self.arch),
    }
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.tag())
  }
}

/// Returns the platform tag for the current system
///
/// Returns `None` if the current platform is not supported
pub fn platform_tag() -> Option<String> {
  Platform::current().map(|p| p.tag())
}

use std::fmt;

use serde::Serialize;

/// CPU architecture variants a build host can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  X86,
  X86_64,
  Arm,
  Aarch64,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    Self::from_rust_arch(std::env::consts::ARCH)
  }

  /// Map a `std::env::consts::ARCH` value onto a known architecture
  pub fn from_rust_arch(arch: &str) -> Option<Self> {
    match arch {
      "x86" => Some(Self::X86),
      "x86_64" => Some(Self::X86_64),
      "arm" => Some(Self::Arm),
      "aarch64" => Some(Self::Aarch64),
      _ => None,
    }
  }

  /// Returns the lowercase string identifier for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X86 => "i686",
      Self::X86_64 => "x86_64",
      Self::Arm => "armv7l",
      Self::Aarch64 => "aarch64",
    }
  }

  /// Returns the suffix used in Windows platform tags (`win-amd64`, `win-arm64`, ...)
  ///
  /// 32-bit x86 has no suffix, its tag is the bare `win32`.
  pub fn windows_suffix(&self) -> Option<&'static str> {
    match self {
      Self::X86 => None,
      Self::X86_64 => Some("amd64"),
      Self::Arm => Some("arm32"),
      Self::Aarch64 => Some("arm64"),
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

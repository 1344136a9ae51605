use std::fmt;
use std::str::FromStr;

use super::ParsePlatformError;

/// CPU architectures a runtime bundle is published for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
  X64,
  Ia32,
  Arm64,
  Armv7l,
}

impl Arch {
  /// Detect the current CPU architecture at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::ARCH {
      "x86_64" => Some(Self::X64),
      "x86" => Some(Self::Ia32),
      "aarch64" => Some(Self::Arm64),
      "arm" => Some(Self::Armv7l),
      _ => None,
    }
  }

  /// Returns the identifier runtime archives use for this architecture
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::X64 => "x64",
      Self::Ia32 => "ia32",
      Self::Arm64 => "arm64",
      Self::Armv7l => "armv7l",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Arch {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "x64" | "x86_64" => Ok(Self::X64),
      "ia32" | "x86" => Ok(Self::Ia32),
      "arm64" | "aarch64" => Ok(Self::Arm64),
      "armv7l" | "arm" => Ok(Self::Armv7l),
      other => Err(ParsePlatformError::Arch(other.to_string())),
    }
  }
}

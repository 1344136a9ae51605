use std::fmt;
use std::str::FromStr;

use super::ParsePlatformError;

/// Operating systems a runtime bundle is published for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
  Linux,
  MacOs,
  Windows,
}

impl Os {
  /// Detect the current operating system at runtime
  pub fn current() -> Option<Self> {
    match std::env::consts::OS {
      "linux" => Some(Self::Linux),
      "macos" => Some(Self::MacOs),
      "windows" => Some(Self::Windows),
      _ => None,
    }
  }

  /// Returns the identifier runtime archives use for this OS
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Linux => "linux",
      Self::MacOs => "darwin",
      Self::Windows => "win32",
    }
  }

  /// Path of the runtime executable relative to the runtime directory.
  pub fn executable_path(&self) -> &'static str {
    match self {
      Self::Linux => "electron",
      Self::MacOs => "Electron.app/Contents/MacOS/Electron",
      Self::Windows => "electron.exe",
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

impl FromStr for Os {
  type Err = ParsePlatformError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "linux" => Ok(Self::Linux),
      "darwin" | "macos" => Ok(Self::MacOs),
      "win32" | "windows" => Ok(Self::Windows),
      other => Err(ParsePlatformError::Os(other.to_string())),
    }
  }
}

//! Platform identification for runtime bundles.

pub mod arch;
pub mod os;
pub mod paths;

pub use arch::Arch;
pub use os::Os;

use std::fmt;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParsePlatformError {
  #[error("unsupported operating system: {0}")]
  Os(String),

  #[error("unsupported architecture: {0}")]
  Arch(String),
}

/// Platform identifier combining OS and architecture (e.g., "darwin-arm64")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Platform {
  pub os: Os,
  pub arch: Arch,
}

impl Platform {
  pub fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// Detect the current platform at runtime
  ///
  /// Returns `None` if the OS or architecture is not supported
  pub fn current() -> Option<Self> {
    Some(Self {
      os: Os::current()?,
      arch: Arch::current()?,
    })
  }

  /// Returns the `os-arch` pair used in archive names (e.g., "linux-x64")
  pub fn pair(&self) -> String {
    format!("{}-{}", self.os, self.arch)
  }

  /// Path of the runtime executable relative to the runtime directory.
  pub fn executable_path(&self) -> &'static str {
    self.os.executable_path()
  }
}

impl fmt::Display for Platform {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.pair())
  }
}

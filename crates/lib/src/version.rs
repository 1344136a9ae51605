//! Desired vs. installed runtime version.
//!
//! The installed version is read from the `version` file every runtime bundle
//! ships at its root. Any failure to read it yields [`VersionCheck::Unknown`],
//! which callers treat exactly like a mismatch.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::consts::RUNTIME_VERSION_FILENAME;

/// Outcome of comparing the desired runtime version with the installed one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionCheck {
  Match,
  Mismatch { installed: String },
  Unknown,
}

impl VersionCheck {
  /// Whether the runtime must be (re)provisioned.
  pub fn needs_download(&self) -> bool {
    !matches!(self, VersionCheck::Match)
  }
}

/// Read the version of the runtime installed at `runtime_dir`.
pub async fn installed_version(runtime_dir: &Path) -> io::Result<String> {
  let content = tokio::fs::read_to_string(runtime_dir.join(RUNTIME_VERSION_FILENAME)).await?;
  let version = normalize(&content);
  if version.is_empty() {
    return Err(io::Error::new(io::ErrorKind::InvalidData, "empty runtime version file"));
  }
  Ok(version.to_string())
}

/// Compare `desired` against the runtime installed at `runtime_dir`.
pub async fn check_runtime_version(desired: &str, runtime_dir: &Path) -> VersionCheck {
  match installed_version(runtime_dir).await {
    Ok(installed) if installed == normalize(desired) => VersionCheck::Match,
    Ok(installed) => VersionCheck::Mismatch { installed },
    Err(e) => {
      debug!(dir = %runtime_dir.display(), error = %e, "installed runtime version unknown");
      VersionCheck::Unknown
    }
  }
}

fn normalize(version: &str) -> &str {
  let version = version.trim();
  version.strip_prefix('v').unwrap_or(version)
}

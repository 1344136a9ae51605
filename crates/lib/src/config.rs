//! Resolved configuration for a single pipeline run.
//!
//! Everything the pipeline needs is resolved up front into a [`BuildConfig`];
//! nothing downstream consults the environment or the application manifest.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::consts::{
  DEFAULT_MIRROR, DEPENDENCY_DIR, LOCK_FILENAME, MANIFEST_FILENAME, MIRROR_ENV, RECORD_FILENAME, RUNTIME_DIR,
};
use crate::manifest::{AppManifest, ManifestError};
use crate::platform::{Arch, Os, Platform, paths};

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error("{} does not declare a runtime version (expected `_electron.version`)", .0.display())]
  MissingRuntimeVersion(PathBuf),

  #[error("unsupported host platform {os}-{arch}; pass --platform and --arch explicitly")]
  UnsupportedPlatform { os: &'static str, arch: &'static str },
}

/// What to download and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSpec {
  pub platform: Platform,
  /// Desired runtime version, without a leading `v`.
  pub version: String,
  pub target_dir: PathBuf,
  /// Base URL release archives are published under.
  pub mirror: String,
  pub cache_dir: PathBuf,
}

impl DownloadSpec {
  /// Archive file name, e.g. `electron-v1.4.3-linux-x64.zip`.
  pub fn archive_name(&self) -> String {
    format!("electron-v{}-{}.zip", self.version, self.platform.pair())
  }

  /// Full archive URL under the mirror.
  pub fn url(&self) -> String {
    format!(
      "{}/v{}/{}",
      self.mirror.trim_end_matches('/'),
      self.version,
      self.archive_name()
    )
  }

  /// Where the archive lives in the download cache.
  pub fn cached_archive(&self) -> PathBuf {
    self.cache_dir.join(self.archive_name())
  }
}

/// Values that take precedence over manifest, environment, and host defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
  pub runtime_version: Option<String>,
  pub runtime_dir: Option<PathBuf>,
  pub os: Option<Os>,
  pub arch: Option<Arch>,
  pub mirror: Option<String>,
  pub rebuild_tool: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
  pub project_root: PathBuf,
  pub dependency_root: PathBuf,
  pub record_path: PathBuf,
  pub lock_path: PathBuf,
  pub rebuild_tool: PathBuf,
  pub download: DownloadSpec,
}

impl BuildConfig {
  /// Resolve the configuration for the project at `project_root`.
  pub fn from_project(project_root: &Path, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
    let runtime_version = match overrides.runtime_version {
      Some(version) => version,
      None => {
        let manifest_path = project_root.join(MANIFEST_FILENAME);
        AppManifest::load(&manifest_path)?
          .runtime_version()
          .map(str::to_string)
          .ok_or(ConfigError::MissingRuntimeVersion(manifest_path))?
      }
    };

    let os = match overrides.os.or_else(Os::current) {
      Some(os) => os,
      None => return Err(unsupported_host()),
    };
    let arch = match overrides.arch.or_else(Arch::current) {
      Some(arch) => arch,
      None => return Err(unsupported_host()),
    };

    let mirror = overrides
      .mirror
      .or_else(|| std::env::var(MIRROR_ENV).ok().filter(|m| !m.is_empty()))
      .unwrap_or_else(|| DEFAULT_MIRROR.to_string());

    let runtime_dir = overrides
      .runtime_dir
      .map(|dir| project_root.join(dir))
      .unwrap_or_else(|| project_root.join(RUNTIME_DIR));

    let rebuild_tool = overrides
      .rebuild_tool
      .map(|tool| project_root.join(tool))
      .unwrap_or_else(|| default_rebuild_tool(project_root));

    Ok(Self {
      project_root: project_root.to_path_buf(),
      dependency_root: project_root.join(DEPENDENCY_DIR),
      record_path: project_root.join(RECORD_FILENAME),
      lock_path: project_root.join(LOCK_FILENAME),
      rebuild_tool,
      download: DownloadSpec {
        platform: Platform::new(os, arch),
        version: runtime_version.trim().trim_start_matches('v').to_string(),
        target_dir: runtime_dir,
        mirror,
        cache_dir: paths::cache_dir(),
      },
    })
  }

  pub fn runtime_dir(&self) -> &Path {
    &self.download.target_dir
  }

  pub fn runtime_version(&self) -> &str {
    &self.download.version
  }
}

fn unsupported_host() -> ConfigError {
  ConfigError::UnsupportedPlatform {
    os: std::env::consts::OS,
    arch: std::env::consts::ARCH,
  }
}

fn default_rebuild_tool(project_root: &Path) -> PathBuf {
  let bin = project_root.join(DEPENDENCY_DIR).join(".bin");
  if cfg!(windows) {
    bin.join("electron-rebuild.cmd")
  } else {
    bin.join("electron-rebuild")
  }
}

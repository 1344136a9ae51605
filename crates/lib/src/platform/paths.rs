use std::path::PathBuf;

use crate::consts::{APP_NAME, CACHE_DIR_ENV};

/// Returns the user's home directory
#[cfg(windows)]
pub fn home_dir() -> PathBuf {
  std::env::var("USERPROFILE").map(PathBuf::from).unwrap_or_else(|_| std::env::temp_dir())
}

/// Returns the user's home directory
#[cfg(not(windows))]
pub fn home_dir() -> PathBuf {
  std::env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| std::env::temp_dir())
}

/// Returns the directory downloaded runtime archives are cached in.
///
/// `RTBUILD_CACHE_DIR` takes precedence over the platform default.
pub fn cache_dir() -> PathBuf {
  if let Ok(dir) = std::env::var(CACHE_DIR_ENV) {
    return PathBuf::from(dir);
  }
  default_cache_dir()
}

#[cfg(windows)]
fn default_cache_dir() -> PathBuf {
  std::env::var("LOCALAPPDATA")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join("AppData").join("Local"))
    .join(APP_NAME)
    .join("Cache")
}

#[cfg(not(windows))]
fn default_cache_dir() -> PathBuf {
  let cache_home = std::env::var("XDG_CACHE_HOME")
    .map(PathBuf::from)
    .unwrap_or_else(|_| home_dir().join(".cache"));
  cache_home.join(APP_NAME)
}

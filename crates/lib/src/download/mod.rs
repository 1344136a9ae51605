//! Runtime bundle provisioning.
//!
//! `provision` gives the target directory a clean slate, fetches the
//! platform's archive (through the download cache), extracts it, and stamps
//! the executable marker. Only a successful return means the directory is
//! usable.

pub mod extract;
pub mod fetch;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::DownloadSpec;
use crate::consts::EXECUTABLE_MARKER_FILENAME;

pub use extract::extract_zip;
pub use fetch::fetch_archive;

#[derive(Debug, Error)]
pub enum DownloadError {
  #[error("fetch failed for {url}: {message}")]
  Fetch { url: String, message: String },

  #[error("failed to extract {}: {message}", .archive.display())]
  Extract { archive: PathBuf, message: String },

  #[error(transparent)]
  Io(#[from] io::Error),

  #[error(transparent)]
  Join(#[from] tokio::task::JoinError),
}

/// Provision the runtime described by `spec` into `spec.target_dir`.
pub async fn provision(spec: &DownloadSpec) -> Result<(), DownloadError> {
  info!(
    version = %spec.version,
    platform = %spec.platform,
    dir = %spec.target_dir.display(),
    "provisioning runtime"
  );

  reset_dir(&spec.target_dir).await?;

  let archive = fetch_archive(&spec.url(), &spec.cached_archive()).await?;

  let (task_archive, target) = (archive.clone(), spec.target_dir.clone());
  if let Err(e) = tokio::task::spawn_blocking(move || extract_zip(&task_archive, &target)).await? {
    // Never leave an unextractable archive in the cache.
    warn!(archive = %archive.display(), error = %e, "discarding archive that failed to extract");
    if let Err(remove) = tokio::fs::remove_file(&archive).await {
      debug!(archive = %archive.display(), error = %remove, "could not remove archive");
    }
    return Err(e);
  }

  write_executable_marker(spec).await?;

  info!(version = %spec.version, "runtime provisioned");
  Ok(())
}

/// Remove whatever is at `dir` and recreate it empty.
async fn reset_dir(dir: &Path) -> io::Result<()> {
  match tokio::fs::symlink_metadata(dir).await {
    Ok(meta) if meta.is_dir() => tokio::fs::remove_dir_all(dir).await?,
    Ok(_) => tokio::fs::remove_file(dir).await?,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {}
    Err(e) => return Err(e),
  }
  tokio::fs::create_dir_all(dir).await
}

async fn write_executable_marker(spec: &DownloadSpec) -> io::Result<()> {
  let marker = spec.target_dir.join(EXECUTABLE_MARKER_FILENAME);
  tokio::fs::write(&marker, spec.platform.executable_path()).await?;
  debug!(path = %marker.display(), "executable marker written");
  Ok(())
}

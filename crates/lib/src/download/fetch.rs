//! Runtime archive fetching.
//!
//! Archives are streamed into a `.part` file next to their cache location and
//! renamed into place only once the whole body arrived, so the cache never
//! holds a truncated archive under its real name.

use std::path::{Path, PathBuf};

use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use super::DownloadError;

/// Fetch `url` into `dest`, reusing `dest` if it is already cached.
pub async fn fetch_archive(url: &str, dest: &Path) -> Result<PathBuf, DownloadError> {
  if fs::metadata(dest).await.map(|m| m.is_file()).unwrap_or(false) {
    info!(path = %dest.display(), "using cached runtime archive");
    return Ok(dest.to_path_buf());
  }

  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent).await?;
  }

  info!(url = %url, "fetching runtime archive");

  let response = reqwest::get(url).await.map_err(|e| DownloadError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  })?;

  if !response.status().is_success() {
    return Err(DownloadError::Fetch {
      url: url.to_string(),
      message: format!("HTTP {}", response.status()),
    });
  }

  let part_path = part_path(dest);
  let size = match stream_to_file(url, response, &part_path).await {
    Ok(size) => size,
    Err(e) => {
      if let Err(cleanup) = fs::remove_file(&part_path).await {
        debug!(path = %part_path.display(), error = %cleanup, "could not remove partial download");
      }
      return Err(e);
    }
  };

  fs::rename(&part_path, dest).await?;

  info!(path = %dest.display(), size, "download complete");
  Ok(dest.to_path_buf())
}

async fn stream_to_file(url: &str, mut response: reqwest::Response, path: &Path) -> Result<u64, DownloadError> {
  let mut file = fs::File::create(path).await?;
  let mut size = 0u64;

  while let Some(chunk) = response.chunk().await.map_err(|e| DownloadError::Fetch {
    url: url.to_string(),
    message: e.to_string(),
  })? {
    file.write_all(&chunk).await?;
    size += chunk.len() as u64;
  }

  file.flush().await?;
  Ok(size)
}

fn part_path(dest: &Path) -> PathBuf {
  let mut name = dest.file_name().unwrap_or_default().to_os_string();
  name.push(".part");
  dest.with_file_name(name)
}

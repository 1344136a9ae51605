//! Zip extraction for runtime bundles.
//!
//! Runtime archives have no wrapping top-level directory, so entries are
//! written to `dest` as-is. Unix modes and symlinks recorded in the archive
//! are restored.
//!
//! Nothing is ever written outside `dest`: entry names must stay enclosed, no
//! entry is written through a previously extracted symlink, and symlink
//! targets may only descend from the link's own directory.

use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Component, Path, PathBuf};

use tracing::info;

use super::DownloadError;

/// Extract every entry of the zip at `archive_path` into `dest`.
pub fn extract_zip(archive_path: &Path, dest: &Path) -> Result<usize, DownloadError> {
  let extract_err = |message: String| DownloadError::Extract {
    archive: archive_path.to_path_buf(),
    message,
  };

  let file = File::open(archive_path)?;
  let mut archive =
    zip::ZipArchive::new(BufReader::new(file)).map_err(|e| extract_err(format!("failed to open zip: {}", e)))?;

  fs::create_dir_all(dest)?;

  for i in 0..archive.len() {
    let mut entry = archive
      .by_index(i)
      .map_err(|e| extract_err(format!("failed to read zip entry {}: {}", i, e)))?;

    let relative = entry
      .enclosed_name()
      .ok_or_else(|| extract_err(format!("entry escapes target directory: {}", entry.name())))?;

    if let Some(link) = linked_ancestor(dest, &relative) {
      return Err(extract_err(format!(
        "entry {} would be written through symlink {}",
        entry.name(),
        link.display()
      )));
    }

    let dest_path = dest.join(&relative);

    if entry.is_dir() {
      fs::create_dir_all(&dest_path)?;
      continue;
    }

    if let Some(parent) = dest_path.parent() {
      fs::create_dir_all(parent)?;
    }

    if entry.is_symlink() {
      let mut target = String::new();
      io::Read::read_to_string(&mut entry, &mut target)?;
      if !descends_only(&target) {
        return Err(extract_err(format!(
          "symlink {} points outside its directory: {}",
          entry.name(),
          target
        )));
      }
      write_symlink(&target, &dest_path)?;
      continue;
    }

    if fs::symlink_metadata(&dest_path).is_ok_and(|m| m.file_type().is_symlink()) {
      fs::remove_file(&dest_path)?;
    }
    let mut outfile = File::create(&dest_path)?;
    io::copy(&mut entry, &mut outfile)?;

    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Some(mode) = entry.unix_mode() {
        fs::set_permissions(&dest_path, fs::Permissions::from_mode(mode & 0o7777))?;
      }
    }
  }

  info!(entries = archive.len(), dest = %dest.display(), "runtime archive extracted");
  Ok(archive.len())
}

/// The first directory between `dest` and the entry at `relative` that is a symlink.
fn linked_ancestor(dest: &Path, relative: &Path) -> Option<PathBuf> {
  let mut current = dest.to_path_buf();
  for component in relative.parent()?.components() {
    current.push(component);
    if fs::symlink_metadata(&current).is_ok_and(|m| m.file_type().is_symlink()) {
      return Some(current);
    }
  }
  None
}

/// True when `target` is relative and has no `..` component.
fn descends_only(target: &str) -> bool {
  let target = Path::new(target);
  target.components().next().is_some()
    && target
      .components()
      .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[cfg(unix)]
fn write_symlink(target: &str, link: &Path) -> io::Result<()> {
  if fs::symlink_metadata(link).is_ok() {
    fs::remove_file(link)?;
  }
  std::os::unix::fs::symlink(target, link)
}

// Runtime archives for non-Unix hosts carry no links; keep the target text so nothing is lost.
#[cfg(not(unix))]
fn write_symlink(target: &str, link: &Path) -> io::Result<()> {
  fs::write(link, target)
}

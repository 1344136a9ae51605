//! Native module discovery.
//!
//! A dependency is a native module when a [`NATIVE_DESCRIPTOR`] file sits at
//! its top level. Only dependencies installed directly in the dependency root
//! are considered: the traversal enumerates the root's children and each
//! child's entries, and never descends further.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::consts::{MANIFEST_FILENAME, NATIVE_DESCRIPTOR};
use crate::manifest::PackageManifest;

/// Native modules keyed by path relative to the dependency root, valued by version.
pub type NativeModules = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ScanError {
  #[error("dependency root {} is not readable", .path.display())]
  Root {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("dependency root {} is not a directory", .0.display())]
  NotADirectory(PathBuf),

  #[error(transparent)]
  Join(#[from] tokio::task::JoinError),
}

/// Scan `dependency_root` for directly installed native modules.
///
/// A module whose manifest is missing or unparseable is logged and skipped;
/// it never aborts the scan of its siblings.
pub async fn scan_native_modules(dependency_root: &Path) -> Result<NativeModules, ScanError> {
  let metadata = tokio::fs::metadata(dependency_root).await.map_err(|source| ScanError::Root {
    path: dependency_root.to_path_buf(),
    source,
  })?;
  if !metadata.is_dir() {
    return Err(ScanError::NotADirectory(dependency_root.to_path_buf()));
  }

  let root = dependency_root.to_path_buf();
  let candidates = tokio::task::spawn_blocking(move || native_module_dirs(&root)).await?;

  let mut modules = NativeModules::new();
  for module_dir in candidates {
    let Some(key) = relative_key(dependency_root, &module_dir) else {
      continue;
    };

    match PackageManifest::load(&module_dir.join(MANIFEST_FILENAME)).await {
      Ok(manifest) => {
        debug!(module = %key, version = %manifest.version, "found native module");
        modules.insert(key, manifest.version);
      }
      Err(e) => {
        let cause = std::error::Error::source(&e).map(ToString::to_string).unwrap_or_default();
        warn!(module = %key, error = %e, cause = %cause, "skipping native module with bad manifest");
      }
    }
  }

  info!(count = modules.len(), root = %dependency_root.display(), "native module scan complete");
  Ok(modules)
}

/// Directories directly under `root` that carry a native build descriptor.
fn native_module_dirs(root: &Path) -> Vec<PathBuf> {
  let mut dirs = Vec::new();

  let walker = WalkDir::new(root)
    .min_depth(2)
    .max_depth(2)
    .follow_links(true)
    .sort_by_file_name();

  for entry in walker {
    let entry = match entry {
      Ok(entry) => entry,
      Err(e) => {
        debug!(error = %e, "skipping unreadable dependency entry");
        continue;
      }
    };

    if entry.file_name() != NATIVE_DESCRIPTOR || !entry.file_type().is_file() {
      continue;
    }

    if let Some(module_dir) = entry.path().parent() {
      dirs.push(module_dir.to_path_buf());
    }
  }

  dirs
}

fn relative_key(root: &Path, module_dir: &Path) -> Option<String> {
  let relative = module_dir.strip_prefix(root).ok()?;
  let parts: Vec<_> = relative.components().map(|c| c.as_os_str().to_string_lossy()).collect();
  if parts.is_empty() {
    return None;
  }
  Some(parts.join("/"))
}

//! Persisted incremental-build record.
//!
//! The record remembers which runtime version and which native module versions
//! the last successful rebuild was performed against, so an unchanged project
//! is not rebuilt again.
//!
//! # Record Format
//!
//! ```json
//! {
//!   "electron": "1.4.3",
//!   "nativeModules": {
//!     "leveldown": "1.5.0"
//!   }
//! }
//! ```
//!
//! Loading is infallible: a missing, unreadable, or malformed record is the
//! same as an empty one. Saving surfaces every failure.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scan::NativeModules;

/// Snapshot of the last successful rebuild.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildRecord {
  /// Runtime version the native modules were last rebuilt against.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub electron: Option<String>,

  /// Native modules (path relative to the dependency root -> version) at the last rebuild.
  /// `None` means the record has never tracked modules.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub native_modules: Option<NativeModules>,

  /// Keys this crate does not own, carried through untouched on save.
  #[serde(flatten)]
  pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BuildRecord {
  pub fn is_empty(&self) -> bool {
    self.electron.is_none() && self.native_modules.is_none() && self.extra.is_empty()
  }

  /// Record a successful rebuild. Modules are replaced wholesale, never merged.
  pub fn mark_rebuilt(&mut self, runtime_version: &str, modules: NativeModules) {
    self.electron = Some(runtime_version.to_string());
    self.native_modules = Some(modules);
  }
}

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("failed to serialize build record")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write build record {}", .path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Owns the on-disk representation of the [`BuildRecord`].
#[derive(Debug, Clone)]
pub struct RecordStore {
  path: PathBuf,
}

impl RecordStore {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the record, returning an empty one on any read or parse failure.
  pub async fn load(&self) -> BuildRecord {
    let content = match tokio::fs::read_to_string(&self.path).await {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => {
        debug!(path = %self.path.display(), "no build record, starting empty");
        return BuildRecord::default();
      }
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "unreadable build record, starting empty");
        return BuildRecord::default();
      }
    };

    match serde_json::from_str(&content) {
      Ok(record) => record,
      Err(e) => {
        warn!(path = %self.path.display(), error = %e, "malformed build record, starting empty");
        BuildRecord::default()
      }
    }
  }

  /// Write the record with 2-space indentation.
  ///
  /// Writes to a sibling temp file and renames it over the record so a crash
  /// never leaves a half-written record behind.
  pub async fn save(&self, record: &BuildRecord) -> Result<(), RecordError> {
    let mut content = serde_json::to_string_pretty(record).map_err(RecordError::Serialize)?;
    content.push('\n');

    let write_err = |source| RecordError::Write {
      path: self.path.clone(),
      source,
    };

    if let Some(parent) = self.path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await.map_err(write_err)?;
    }

    let mut temp_name = self.path.file_name().unwrap_or_default().to_os_string();
    temp_name.push(".tmp");
    let temp_path = self.path.with_file_name(temp_name);

    tokio::fs::write(&temp_path, &content).await.map_err(write_err)?;
    tokio::fs::rename(&temp_path, &self.path).await.map_err(write_err)?;

    debug!(path = %self.path.display(), "build record saved");
    Ok(())
  }
}

//! Application and dependency manifests (`package.json`).
//!
//! Only the handful of fields this crate consumes are modelled; everything
//! else in the file is ignored.

use std::io;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
  #[error("failed to read manifest {path}")]
  Read {
    path: String,
    #[source]
    source: io::Error,
  },

  #[error("failed to parse manifest {path}")]
  Parse {
    path: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Runtime metadata embedded in the application manifest under `_electron`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RuntimeMetadata {
  pub version: Option<String>,
}

/// The application's own manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppManifest {
  pub name: Option<String>,
  pub version: Option<String>,
  #[serde(rename = "_electron", default)]
  pub runtime: RuntimeMetadata,
}

impl AppManifest {
  pub fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
      path: path.display().to_string(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.display().to_string(),
      source,
    })
  }

  /// The runtime version the application declares it is built against.
  pub fn runtime_version(&self) -> Option<&str> {
    self.runtime.version.as_deref()
  }
}

/// A dependency's manifest. A dependency without a `version` is treated as unreadable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PackageManifest {
  pub name: Option<String>,
  pub version: String,
}

impl PackageManifest {
  pub async fn load(path: &Path) -> Result<Self, ManifestError> {
    let content = tokio::fs::read_to_string(path)
      .await
      .map_err(|source| ManifestError::Read {
        path: path.display().to_string(),
        source,
      })?;
    serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
      path: path.display().to_string(),
      source,
    })
  }
}

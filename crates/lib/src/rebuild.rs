//! Native module rebuild via the external rebuild tool.
//!
//! The tool is run with `-f` (force) and `-e <runtime dir>` (target runtime)
//! and inherits this process's standard streams so its progress is visible
//! live. Its exit code is the only success signal.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum RebuildError {
  #[error("failed to start rebuild tool {}", .program.display())]
  Spawn {
    program: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// The external rebuild tool and the directory it runs in.
#[derive(Debug, Clone)]
pub struct RebuildTool {
  program: PathBuf,
  working_dir: PathBuf,
}

impl RebuildTool {
  pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
    Self {
      program: program.into(),
      working_dir: working_dir.into(),
    }
  }

  /// Arguments passed to the tool for `runtime_dir`.
  pub fn args(runtime_dir: &Path) -> Vec<OsString> {
    vec!["-f".into(), "-e".into(), runtime_dir.as_os_str().to_owned()]
  }

  /// Run the tool to completion against `runtime_dir`.
  ///
  /// Returns the exit code, or `None` if the tool was terminated by a signal.
  pub async fn execute(&self, runtime_dir: &Path) -> Result<Option<i32>, RebuildError> {
    info!(program = %self.program.display(), runtime = %runtime_dir.display(), "rebuilding native modules");

    let status = Command::new(&self.program)
      .args(Self::args(runtime_dir))
      .current_dir(&self.working_dir)
      .stdin(Stdio::inherit())
      .stdout(Stdio::inherit())
      .stderr(Stdio::inherit())
      .status()
      .await
      .map_err(|source| RebuildError::Spawn {
        program: self.program.clone(),
        source,
      })?;

    debug!(status = %status, "rebuild tool exited");
    Ok(status.code())
  }
}

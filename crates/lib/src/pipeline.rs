//! End-to-end dependency build pipeline.
//!
//! ```text
//! lock -> load record -> check version -> [provision] -> scan
//!      -> (no modules: done) -> decide -> (up to date: done)
//!      -> rebuild -> persist record
//! ```
//!
//! Steps run strictly in sequence. The record is loaded once at the start and
//! written at most once, after a successful rebuild.

use std::future::Future;
use std::path::Path;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{BuildConfig, DownloadSpec};
use crate::decide::{RebuildDecision, decide};
use crate::download::{self, DownloadError};
use crate::lock::{BuildLock, LockError};
use crate::rebuild::{RebuildError, RebuildTool};
use crate::record::{BuildRecord, RecordError, RecordStore};
use crate::scan::{NativeModules, ScanError, scan_native_modules};
use crate::version::{VersionCheck, check_runtime_version};

/// Puts a runtime bundle on disk.
pub trait RuntimeProvisioner {
  fn provision(&self, spec: &DownloadSpec) -> impl Future<Output = Result<(), DownloadError>> + Send;
}

/// Rebuilds native modules against a runtime, returning the exit code.
pub trait NativeRebuilder {
  fn rebuild(&self, runtime_dir: &Path) -> impl Future<Output = Result<Option<i32>, RebuildError>> + Send;
}

/// Downloads runtime bundles from the configured mirror.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpProvisioner;

impl RuntimeProvisioner for HttpProvisioner {
  async fn provision(&self, spec: &DownloadSpec) -> Result<(), DownloadError> {
    download::provision(spec).await
  }
}

impl NativeRebuilder for RebuildTool {
  async fn rebuild(&self, runtime_dir: &Path) -> Result<Option<i32>, RebuildError> {
    self.execute(runtime_dir).await
  }
}

#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("could not lock project")]
  Lock(#[from] LockError),

  #[error("runtime download failed")]
  Download(#[source] DownloadError),

  #[error("native module scan failed")]
  Scan(#[from] ScanError),

  #[error("native module rebuild failed")]
  Rebuild(#[from] RebuildError),

  #[error("native module rebuild failed: tool {}", describe_exit(.code))]
  RebuildFailed { code: Option<i32> },

  #[error("failed to persist build record")]
  Persist(#[from] RecordError),
}

fn describe_exit(code: &Option<i32>) -> String {
  match code {
    Some(code) => format!("exited with code {}", code),
    None => "was terminated by a signal".to_string(),
  }
}

/// What a pipeline run did.
#[derive(Debug, Clone)]
pub struct BuildReport {
  pub version_check: VersionCheck,
  pub downloaded: bool,
  pub modules: NativeModules,
  pub decision: RebuildDecision,
  pub rebuilt: bool,
}

/// What a pipeline run would do, computed without side effects.
#[derive(Debug, Clone)]
pub struct BuildPlan {
  pub version_check: VersionCheck,
  pub record: BuildRecord,
  pub modules: NativeModules,
  pub decision: RebuildDecision,
}

impl BuildPlan {
  pub fn would_download(&self) -> bool {
    self.version_check.needs_download()
  }
}

/// Run the pipeline with the real downloader and rebuild tool.
pub async fn build_deps(config: &BuildConfig) -> Result<BuildReport, PipelineError> {
  let tool = RebuildTool::new(&config.rebuild_tool, &config.project_root);
  run(config, &HttpProvisioner, &tool).await
}

/// Run the pipeline with the given collaborators.
pub async fn run<P, R>(config: &BuildConfig, provisioner: &P, rebuilder: &R) -> Result<BuildReport, PipelineError>
where
  P: RuntimeProvisioner,
  R: NativeRebuilder,
{
  let _lock = BuildLock::exclusive(&config.lock_path, "deps")?;

  let store = RecordStore::new(&config.record_path);
  let mut record = store.load().await;
  let runtime_version = config.runtime_version();

  let version_check = check_runtime_version(runtime_version, config.runtime_dir()).await;
  let downloaded = match &version_check {
    VersionCheck::Match => {
      info!(version = %runtime_version, "runtime up to date");
      false
    }
    check => {
      info!(version = %runtime_version, ?check, "runtime needs provisioning");
      provision_with_redo(provisioner, &config.download).await?;
      true
    }
  };

  let modules = scan_native_modules(&config.dependency_root).await?;

  let mut report = BuildReport {
    version_check,
    downloaded,
    modules,
    decision: RebuildDecision::default(),
    rebuilt: false,
  };

  if report.modules.is_empty() {
    info!("no native modules found, nothing to rebuild");
    return Ok(report);
  }

  report.decision = decide(&report.modules, &record, runtime_version);
  let Some(reason) = &report.decision.reason else {
    info!(count = report.modules.len(), "native modules up to date");
    return Ok(report);
  };

  info!(reason = %reason, count = report.modules.len(), "rebuilding native modules");
  match rebuilder.rebuild(config.runtime_dir()).await? {
    Some(0) => {}
    code => return Err(PipelineError::RebuildFailed { code }),
  }

  record.mark_rebuilt(runtime_version, report.modules.clone());
  store.save(&record).await?;
  report.rebuilt = true;

  info!(version = %runtime_version, "native modules rebuilt");
  Ok(report)
}

/// Compute what [`run`] would do without downloading, rebuilding, or writing.
pub async fn plan(config: &BuildConfig) -> Result<BuildPlan, PipelineError> {
  let _lock = BuildLock::shared(&config.lock_path)?;

  let record = RecordStore::new(&config.record_path).load().await;
  let version_check = check_runtime_version(config.runtime_version(), config.runtime_dir()).await;
  let modules = scan_native_modules(&config.dependency_root).await?;
  let decision = decide(&modules, &record, config.runtime_version());

  Ok(BuildPlan {
    version_check,
    record,
    modules,
    decision,
  })
}

/// Provision the runtime, redoing the whole download once if the first attempt fails.
async fn provision_with_redo<P: RuntimeProvisioner>(provisioner: &P, spec: &DownloadSpec) -> Result<(), PipelineError> {
  if let Err(e) = provisioner.provision(spec).await {
    warn!(error = %e, "runtime provisioning failed, retrying from scratch");
    provisioner.provision(spec).await.map_err(PipelineError::Download)?;
  }
  Ok(())
}

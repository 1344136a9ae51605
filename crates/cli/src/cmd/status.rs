//! Status command implementation.
//!
//! Reports desired vs. installed runtime, the persisted build record, and
//! which native modules `deps` would rebuild. Changes nothing on disk.

use anyhow::{Context, Result};

use rtbuild_lib::scan::NativeModules;
use rtbuild_lib::version::VersionCheck;
use rtbuild_lib::{BuildConfig, plan};

use crate::output::{OutputFormat, RebuildState, Tone, print_json, print_modules, print_rebuild_state, say, stat};

pub fn cmd_status(config: &BuildConfig, verbose: bool, format: OutputFormat) -> Result<()> {
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let plan = rt.block_on(plan(config)).context("Failed to inspect project")?;

  let installed = match &plan.version_check {
    VersionCheck::Match => Some(config.runtime_version().to_string()),
    VersionCheck::Mismatch { installed } => Some(installed.clone()),
    VersionCheck::Unknown => None,
  };

  if format.is_json() {
    let json_output = serde_json::json!({
      "runtime": {
        "desired": config.runtime_version(),
        "installed": installed,
        "dir": config.runtime_dir(),
        "platform": config.download.platform.pair(),
      },
      "record": (!plan.record.is_empty()).then_some(&plan.record),
      "native_modules": plan.modules,
      "would_download": plan.would_download(),
      "would_rebuild": plan.decision.rebuild(),
      "rebuild_reason": plan.decision.reason.as_ref().map(|r| r.to_string()),
    });
    return print_json(&json_output);
  }

  stat("Desired runtime", config.runtime_version());
  stat("Installed runtime", installed.as_deref().unwrap_or("none"));
  if plan.record.is_empty() {
    stat("Build record", "none");
  } else {
    stat("Recorded runtime", plan.record.electron.as_deref().unwrap_or("none"));
  }
  stat("Native modules", plan.modules.len());

  if verbose && !plan.modules.is_empty() {
    println!();
    let never_recorded = NativeModules::new();
    let baseline = plan.record.native_modules.as_ref().unwrap_or(&never_recorded);
    print_modules(&plan.modules, Some(baseline));
  }

  println!();
  if plan.would_download() {
    say(Tone::Warn, &format!("Runtime {} would be downloaded", config.runtime_version()));
  }
  let state = match &plan.decision.reason {
    Some(reason) => RebuildState::Pending(reason),
    None => RebuildState::Current,
  };
  print_rebuild_state(&plan.modules, state);

  Ok(())
}

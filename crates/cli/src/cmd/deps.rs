//! Implementation of the `rtbuild deps` command.
//!
//! Makes sure the pinned runtime is installed and that every native
//! dependency has been rebuilt against it, then prints a summary.

use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use rtbuild_lib::{BuildConfig, build_deps};

use crate::output::{OutputFormat, RebuildState, Tone, format_elapsed, print_json, print_modules, print_rebuild_state, say, stat};

pub fn cmd_deps(config: &BuildConfig, format: OutputFormat) -> Result<()> {
  let started = Instant::now();

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let report = rt.block_on(build_deps(config)).context("Dependency build failed")?;
  let elapsed = started.elapsed();
  debug!(elapsed_ms = elapsed.as_millis() as u64, rebuilt = report.rebuilt, "deps finished");

  if format.is_json() {
    let json_output = serde_json::json!({
      "runtime_version": config.runtime_version(),
      "runtime_dir": config.runtime_dir(),
      "downloaded": report.downloaded,
      "native_modules": report.modules,
      "rebuilt": report.rebuilt,
      "rebuild_reason": report.decision.reason.as_ref().map(|r| r.to_string()),
      "elapsed_ms": elapsed.as_millis() as u64,
    });
    return print_json(&json_output);
  }

  if report.downloaded {
    say(Tone::Done, &format!("Runtime {} downloaded", config.runtime_version()));
  } else {
    say(Tone::Note, &format!("Runtime {} already installed", config.runtime_version()));
  }

  match report.decision.reason.as_ref().filter(|_| report.rebuilt) {
    Some(reason) => {
      print_rebuild_state(&report.modules, RebuildState::Rebuilt(reason));
      print_modules(&report.modules, None);
    }
    None => print_rebuild_state(&report.modules, RebuildState::Current),
  }

  stat("Elapsed", format_elapsed(elapsed));
  Ok(())
}

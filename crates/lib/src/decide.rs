//! Rebuild decision.
//!
//! The decision is all-or-nothing: a single reason invalidates the whole set
//! of native modules. Modules that disappeared since the last rebuild are not
//! a reason on their own.

use std::fmt;

use crate::record::BuildRecord;
use crate::scan::NativeModules;

/// Why a rebuild is required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebuildReason {
  RuntimeChanged { previous: Option<String>, current: String },
  NoModuleHistory,
  ModuleAdded { module: String },
  ModuleChanged { module: String, previous: String, current: String },
}

impl fmt::Display for RebuildReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RebuildReason::RuntimeChanged {
        previous: Some(previous),
        current,
      } => write!(f, "runtime changed from {} to {}", previous, current),
      RebuildReason::RuntimeChanged { previous: None, current } => {
        write!(f, "no previous rebuild against runtime {}", current)
      }
      RebuildReason::NoModuleHistory => write!(f, "no native modules recorded"),
      RebuildReason::ModuleAdded { module } => write!(f, "{} was added", module),
      RebuildReason::ModuleChanged {
        module,
        previous,
        current,
      } => write!(f, "{} changed from {} to {}", module, previous, current),
    }
  }
}

/// Result of [`decide`]. `reason` is `None` when no rebuild is needed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RebuildDecision {
  pub reason: Option<RebuildReason>,
}

impl RebuildDecision {
  pub fn rebuild(&self) -> bool {
    self.reason.is_some()
  }
}

/// Decide whether `current` must be rebuilt against `runtime_version`.
pub fn decide(current: &NativeModules, previous: &BuildRecord, runtime_version: &str) -> RebuildDecision {
  RebuildDecision {
    reason: first_reason(current, previous, runtime_version),
  }
}

fn first_reason(current: &NativeModules, previous: &BuildRecord, runtime_version: &str) -> Option<RebuildReason> {
  // Nothing to build.
  if current.is_empty() {
    return None;
  }

  if previous.electron.as_deref() != Some(runtime_version) {
    return Some(RebuildReason::RuntimeChanged {
      previous: previous.electron.clone(),
      current: runtime_version.to_string(),
    });
  }

  let Some(recorded) = &previous.native_modules else {
    return Some(RebuildReason::NoModuleHistory);
  };

  for (module, version) in current {
    match recorded.get(module) {
      None => {
        return Some(RebuildReason::ModuleAdded { module: module.clone() });
      }
      Some(previous_version) if previous_version != version => {
        return Some(RebuildReason::ModuleChanged {
          module: module.clone(),
          previous: previous_version.clone(),
          current: version.clone(),
        });
      }
      Some(_) => {}
    }
  }

  None
}

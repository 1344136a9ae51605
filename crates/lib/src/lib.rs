//! rtbuild-lib: pre-packaging gate for applications that bundle a native runtime.
//!
//! Before an application is packaged this crate guarantees that:
//! - the pinned runtime bundle is present on disk (`download`, `version`)
//! - every directly installed dependency with a native addon has been rebuilt
//!   against that runtime (`scan`, `decide`, `rebuild`)
//!
//! The last successful rebuild is remembered in a small JSON record (`record`)
//! so unchanged projects skip the rebuild. [`pipeline::build_deps`] sequences
//! all of it and is the entry point callers use.

pub mod config;
pub mod consts;
pub mod decide;
pub mod download;
pub mod lock;
pub mod manifest;
pub mod pipeline;
pub mod platform;
pub mod rebuild;
pub mod record;
pub mod scan;
pub mod version;

pub use config::{BuildConfig, ConfigError, ConfigOverrides, DownloadSpec};
pub use pipeline::{BuildPlan, BuildReport, PipelineError, build_deps, plan};

//! Shared test helpers for CLI integration tests.

use std::path::PathBuf;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

pub const RUNTIME_VERSION: &str = "1.4.3";

/// Isolated project directory.
///
/// Each test gets its own project with a `package.json` pinning
/// [`RUNTIME_VERSION`], an empty `node_modules`, and a download cache and
/// mirror that keep the binary off the network.
pub struct TestProject {
  pub temp: TempDir,
}

impl TestProject {
  pub fn new() -> Self {
    let temp = TempDir::new().unwrap();
    let project = Self { temp };
    project.write_file(
      "package.json",
      &format!(r#"{{ "name": "app", "_electron": {{ "version": "{}" }} }}"#, RUNTIME_VERSION),
    );
    std::fs::create_dir_all(project.root().join("node_modules")).unwrap();
    project
  }

  /// A project whose runtime is already installed at [`RUNTIME_VERSION`].
  pub fn with_runtime() -> Self {
    let project = Self::new();
    project.write_file(".electron/version", &format!("v{}", RUNTIME_VERSION));
    project
  }

  pub fn root(&self) -> PathBuf {
    let p = self.temp.path().join("project");
    std::fs::create_dir_all(&p).unwrap();
    dunce::canonicalize(&p).unwrap_or(p)
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.root().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> Option<String> {
    std::fs::read_to_string(self.root().join(relative_path)).ok()
  }

  pub fn add_native_module(&self, name: &str, version: &str) {
    self.write_file(&format!("node_modules/{}/binding.gyp", name), "{}");
    self.write_file(
      &format!("node_modules/{}/package.json", name),
      &format!(r#"{{ "name": "{}", "version": "{}" }}"#, name, version),
    );
  }

  /// Install a stand-in rebuild tool that appends its arguments to `rebuild.log`.
  #[cfg(unix)]
  pub fn install_rebuild_tool(&self, exit_code: i32) {
    use std::os::unix::fs::PermissionsExt;

    let path = self.root().join("node_modules/.bin/electron-rebuild");
    self.write_file(
      "node_modules/.bin/electron-rebuild",
      &format!("#!/bin/sh\necho \"$@\" >> rebuild.log\nexit {}\n", exit_code),
    );
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
  }

  pub fn rebuild_runs(&self) -> Vec<String> {
    self
      .read_file("rebuild.log")
      .map(|log| log.lines().map(str::to_string).collect())
      .unwrap_or_default()
  }

  fn cache_path(&self) -> PathBuf {
    self.temp.path().join("cache")
  }

  /// Get a pre-configured Command for the rtbuild binary.
  ///
  /// Sets environment variables for isolated testing:
  /// - `RTBUILD_CACHE_DIR`: Isolated download cache
  /// - `ELECTRON_MIRROR`: A closed local port, so downloads fail fast
  pub fn rtbuild_cmd(&self, subcommand: &str) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("rtbuild");
    cmd.env("RTBUILD_CACHE_DIR", self.cache_path());
    cmd.env("ELECTRON_MIRROR", "http://127.0.0.1:9/");
    cmd.env_remove("RUST_LOG");
    cmd.arg(subcommand).arg(self.root());
    cmd
  }

  pub fn runtime_dir(&self) -> PathBuf {
    self.root().join(".electron")
  }
}

//! Integration tests for `rtbuild deps`.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn deps_without_native_modules_writes_no_record() {
  let project = TestProject::with_runtime();

  project
    .rtbuild_cmd("deps")
    .assert()
    .success()
    .stdout(predicate::str::contains("already installed"))
    .stdout(predicate::str::contains("No native modules found"));

  assert!(project.read_file(".build-config.json").is_none());
}

#[test]
#[cfg(unix)]
fn deps_rebuilds_native_modules_and_records_them() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);

  project
    .rtbuild_cmd("deps")
    .assert()
    .success()
    .stdout(predicate::str::contains("Rebuilt 1 native module →"))
    .stdout(predicate::str::contains("leveldown@1.5.0"));

  let runs = project.rebuild_runs();
  assert_eq!(runs.len(), 1);
  assert!(runs[0].starts_with("-f -e "), "unexpected arguments: {}", runs[0]);
  assert!(runs[0].ends_with(".electron"), "unexpected arguments: {}", runs[0]);

  let record: serde_json::Value =
    serde_json::from_str(&project.read_file(".build-config.json").unwrap()).unwrap();
  assert_eq!(record["electron"], "1.4.3");
  assert_eq!(record["nativeModules"]["leveldown"], "1.5.0");
}

#[test]
#[cfg(unix)]
fn second_deps_run_is_a_no_op() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);

  project.rtbuild_cmd("deps").assert().success();
  let first_record = project.read_file(".build-config.json").unwrap();

  project
    .rtbuild_cmd("deps")
    .assert()
    .success()
    .stdout(predicate::str::contains("1 native module up to date"));

  assert_eq!(project.rebuild_runs().len(), 1);
  assert_eq!(project.read_file(".build-config.json").unwrap(), first_record);
}

#[test]
#[cfg(unix)]
fn deps_rebuilds_again_after_module_upgrade() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);

  project.rtbuild_cmd("deps").assert().success();
  project.add_native_module("leveldown", "1.6.0");

  project
    .rtbuild_cmd("deps")
    .assert()
    .success()
    .stdout(predicate::str::contains("leveldown changed from 1.5.0 to 1.6.0"));

  assert_eq!(project.rebuild_runs().len(), 2);
}

#[test]
#[cfg(unix)]
fn deps_json_output_reports_the_rebuild() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);

  let output = project.rtbuild_cmd("deps").args(["-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["runtime_version"], "1.4.3");
  assert_eq!(json["downloaded"], false);
  assert_eq!(json["rebuilt"], true);
  assert_eq!(json["native_modules"]["leveldown"], "1.5.0");
}

#[test]
#[cfg(unix)]
fn failing_rebuild_tool_fails_and_leaves_no_record() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(3);

  project
    .rtbuild_cmd("deps")
    .assert()
    .failure()
    .stderr(predicate::str::contains("exited with code 3"));

  assert!(project.read_file(".build-config.json").is_none());
}

#[test]
fn manifest_without_runtime_version_is_rejected() {
  let project = TestProject::with_runtime();
  project.write_file("package.json", r#"{ "name": "app" }"#);

  project
    .rtbuild_cmd("deps")
    .assert()
    .failure()
    .stderr(predicate::str::contains("does not declare a runtime version"));
}

#[test]
fn electron_version_flag_overrides_manifest() {
  let project = TestProject::with_runtime();
  project.write_file("package.json", r#"{ "name": "app" }"#);

  project
    .rtbuild_cmd("deps")
    .args(["--electron-version", "1.4.3"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Runtime 1.4.3 already installed"));
}

#[test]
fn unreachable_mirror_fails_download() {
  let project = TestProject::new();

  project
    .rtbuild_cmd("deps")
    .assert()
    .failure()
    .stderr(predicate::str::contains("runtime download failed"));

  assert!(project.read_file(".build-config.json").is_none());
}

#[test]
fn missing_dependency_root_fails_scan() {
  let project = TestProject::with_runtime();
  std::fs::remove_dir_all(project.root().join("node_modules")).unwrap();

  project
    .rtbuild_cmd("deps")
    .assert()
    .failure()
    .stderr(predicate::str::contains("native module scan failed: dependency root"));

  let output = project.rtbuild_cmd("deps").output().unwrap();
  let stderr = String::from_utf8_lossy(&output.stderr);
  assert_eq!(stderr.matches("is not readable").count(), 1, "cause repeated: {stderr}");
}

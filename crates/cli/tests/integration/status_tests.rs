//! Integration tests for `rtbuild status`.

use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn status_reports_pending_rebuild() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");

  project
    .rtbuild_cmd("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Desired runtime"))
    .stdout(predicate::str::contains("1 native module would be rebuilt"));
}

#[test]
fn status_on_fresh_project_warns_about_download() {
  let project = TestProject::new();

  project
    .rtbuild_cmd("status")
    .assert()
    .success()
    .stderr(predicate::str::contains("would be downloaded"));

  assert!(!project.runtime_dir().exists());
}

#[test]
fn status_does_not_change_the_project() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");

  project.rtbuild_cmd("status").assert().success();

  assert!(project.read_file(".build-config.json").is_none());
  assert!(project.rebuild_runs().is_empty());
}

#[test]
fn status_json_is_valid() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");

  let output = project.rtbuild_cmd("status").args(["-o", "json"]).output().unwrap();
  assert!(output.status.success());

  let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
  assert_eq!(json["runtime"]["desired"], "1.4.3");
  assert_eq!(json["runtime"]["installed"], "1.4.3");
  assert_eq!(json["would_download"], false);
  assert_eq!(json["would_rebuild"], true);
  assert_eq!(json["native_modules"]["leveldown"], "1.5.0");
}

#[test]
#[cfg(unix)]
fn status_after_deps_is_up_to_date() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);

  project.rtbuild_cmd("deps").assert().success();

  project
    .rtbuild_cmd("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("1 native module up to date"));
}

#[test]
fn status_without_record_says_so() {
  let project = TestProject::with_runtime();

  project
    .rtbuild_cmd("status")
    .assert()
    .success()
    .stdout(predicate::str::contains("Build record: none"))
    .stdout(predicate::str::contains("No native modules found"));
}

#[test]
#[cfg(unix)]
fn verbose_status_marks_changed_modules() {
  let project = TestProject::with_runtime();
  project.add_native_module("leveldown", "1.5.0");
  project.install_rebuild_tool(0);
  project.rtbuild_cmd("deps").assert().success();

  project.add_native_module("leveldown", "1.6.0");
  project.add_native_module("keytar", "3.0.2");

  project
    .rtbuild_cmd("status")
    .arg("--verbose")
    .assert()
    .success()
    .stdout(predicate::str::contains("~ leveldown@1.6.0 (was 1.5.0)"))
    .stdout(predicate::str::contains("+ keytar@3.0.2"));
}

#[test]
fn verbose_logs_resolved_configuration() {
  let project = TestProject::with_runtime();

  project
    .rtbuild_cmd("status")
    .arg("--verbose")
    .assert()
    .success()
    .stderr(predicate::str::contains("resolved project configuration"));
}
